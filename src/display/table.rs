use crate::api::models::{
    HealthCheck, LoanDetail, LoanResult, LoanStatus, Payment, PaymentStatus, PaymentSummary,
    ServiceStatus,
};
use chrono::{DateTime, Utc};
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets};

const DEFAULT_WIDTH: usize = 100;

/// Formatter for loan service resources
pub struct TableDisplay {
    max_width: Option<usize>,
    use_colors: bool,
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDisplay {
    /// Create a new TableDisplay instance
    pub fn new() -> Self {
        Self {
            max_width: Some(DEFAULT_WIDTH),
            use_colors: true,
        }
    }

    /// Create a TableDisplay instance with maximum width setting
    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width.max(40));
        self
    }

    /// Set color usage
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Render a loan list in table format
    pub fn render_loans(&self, loans: &[LoanDetail]) -> String {
        if loans.is_empty() {
            return "No loans found.".to_string();
        }

        let mut table = self.new_table();
        table.set_header(self.header(&["ID", "Applicant", "Amount", "Term", "Rate", "Status"]));

        for loan in loans {
            table.add_row(vec![
                self.id_cell(&loan.id),
                Cell::new(self.truncate_text(&loan.applicant_name, 24)),
                Cell::new(format_amount(loan.amount)),
                Cell::new(format!("{} mo", loan.term_months)),
                Cell::new(format!("{:.2}%", loan.interest_rate)),
                self.loan_status_cell(loan.status),
            ]);
        }

        table.to_string()
    }

    /// Render one loan as a two-column detail table
    pub fn render_loan(&self, loan: &LoanDetail) -> String {
        let mut table = self.new_table();
        table.set_header(self.header(&["Field", "Value"]));

        table.add_row(vec![Cell::new("ID"), self.id_cell(&loan.id)]);
        table.add_row(vec![Cell::new("Applicant"), Cell::new(&loan.applicant_name)]);
        table.add_row(vec![Cell::new("Email"), Cell::new(&loan.applicant_email)]);
        table.add_row(vec![
            Cell::new("Employment"),
            Cell::new(loan.employment_status.to_string()),
        ]);
        table.add_row(vec![Cell::new("Amount"), Cell::new(format_amount(loan.amount))]);
        table.add_row(vec![
            Cell::new("Term"),
            Cell::new(format!("{} months", loan.term_months)),
        ]);
        table.add_row(vec![
            Cell::new("Interest Rate"),
            Cell::new(format!("{:.2}%", loan.interest_rate)),
        ]);
        table.add_row(vec![Cell::new("Status"), self.loan_status_cell(loan.status)]);
        table.add_row(vec![
            Cell::new("Created"),
            Cell::new(format_datetime(&loan.created_at)),
        ]);
        table.add_row(vec![
            Cell::new("Updated"),
            Cell::new(format_datetime(&loan.updated_at)),
        ]);

        table.to_string()
    }

    /// Render the outcome of a loan application
    pub fn render_loan_result(&self, result: &LoanResult) -> String {
        match result {
            LoanResult::Approved {
                loan_id,
                interest_rate,
                monthly_payment,
            } => format!(
                "✅ Loan approved\n  Loan ID: {}\n  Interest rate: {:.2}%\n  Monthly payment: {}",
                loan_id,
                interest_rate,
                format_amount(*monthly_payment)
            ),
            LoanResult::Rejected { reason } => format!("❌ Loan rejected: {}", reason),
        }
    }

    /// Render a payment list in table format
    pub fn render_payments(&self, payments: &[Payment]) -> String {
        if payments.is_empty() {
            return "No payments found.".to_string();
        }

        let mut table = self.new_table();
        table.set_header(self.header(&["ID", "Amount", "Method", "Status", "Processed", "Reference"]));

        for payment in payments {
            table.add_row(self.payment_row(payment));
        }

        table.to_string()
    }

    /// Render a single payment
    pub fn render_payment(&self, payment: &Payment) -> String {
        let mut table = self.new_table();
        table.set_header(self.header(&["ID", "Amount", "Method", "Status", "Processed", "Reference"]));
        table.add_row(self.payment_row(payment));
        format!("Loan {}\n{}", payment.loan_id, table)
    }

    /// Render the payment summary of a loan
    pub fn render_summary(&self, loan_id: &str, summary: &PaymentSummary) -> String {
        let mut table = self.new_table();
        table.set_header(self.header(&["Loan", "Total Paid", "Remaining", "Next Due", "Payments"]));
        table.add_row(vec![
            self.id_cell(loan_id),
            Cell::new(format_amount(summary.total_paid)),
            Cell::new(format_amount(summary.remaining_balance)),
            Cell::new(summary.next_payment_due.format("%Y-%m-%d").to_string()),
            Cell::new(summary.payment_count.to_string()),
        ]);
        table.to_string()
    }

    /// Render the service health check
    pub fn render_health(&self, health: &HealthCheck) -> String {
        let mut table = self.new_table();
        table.set_header(self.header(&["Status", "Version", "Uptime", "Checked"]));

        let status = Cell::new(health.status.to_string());
        let status = if self.use_colors {
            status.fg(match health.status {
                ServiceStatus::Up => Color::Green,
                ServiceStatus::Degraded => Color::Yellow,
                ServiceStatus::Down => Color::Red,
            })
        } else {
            status
        };

        table.add_row(vec![
            status,
            Cell::new(health.version.as_deref().unwrap_or("-")),
            Cell::new(
                health
                    .uptime
                    .map(|seconds| format!("{:.0}s", seconds))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(format_datetime(&health.timestamp)),
        ]);
        table.to_string()
    }

    fn payment_row(&self, payment: &Payment) -> Vec<Cell> {
        let status = Cell::new(payment.status.to_string());
        let status = if self.use_colors {
            status.fg(match payment.status {
                PaymentStatus::Completed => Color::Green,
                PaymentStatus::Pending => Color::Yellow,
                PaymentStatus::Failed => Color::Red,
            })
        } else {
            status
        };

        vec![
            self.id_cell(&payment.id),
            Cell::new(format_amount(payment.amount)),
            Cell::new(payment.method.to_string()),
            status,
            Cell::new(format_datetime(&payment.processed_at)),
            Cell::new(payment.reference.as_deref().unwrap_or("-")),
        ]
    }

    fn new_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_width(self.max_width.unwrap_or(DEFAULT_WIDTH) as u16);
        table
    }

    fn header(&self, titles: &[&str]) -> Vec<Cell> {
        titles
            .iter()
            .map(|title| {
                if self.use_colors {
                    Cell::new(title)
                        .add_attribute(Attribute::Bold)
                        .fg(Color::Cyan)
                } else {
                    Cell::new(title)
                }
            })
            .collect()
    }

    fn id_cell(&self, id: &str) -> Cell {
        if self.use_colors {
            Cell::new(id).fg(Color::Cyan)
        } else {
            Cell::new(id)
        }
    }

    fn loan_status_cell(&self, status: LoanStatus) -> Cell {
        let cell = Cell::new(status.to_string());
        if !self.use_colors {
            return cell;
        }
        match status {
            LoanStatus::Approved | LoanStatus::Active => cell.fg(Color::Green),
            LoanStatus::PaidOff => cell.fg(Color::DarkGrey),
            LoanStatus::Pending => cell.fg(Color::Yellow),
            LoanStatus::Rejected | LoanStatus::Defaulted => cell.fg(Color::Red),
        }
    }

    fn truncate_text(&self, text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            return text.to_string();
        }
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

fn format_datetime(datetime: &DateTime<Utc>) -> String {
    datetime.format("%Y-%m-%d %H:%M").to_string()
}
