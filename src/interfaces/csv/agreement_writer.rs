use crate::domain::agreement::Agreement;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// One output row per installment.
#[derive(Debug, Serialize)]
struct InstallmentRow<'a> {
    agreement: &'a str,
    user: &'a str,
    cart: &'a str,
    total: String,
    agreement_status: &'static str,
    /// One-based, as shown to the user.
    installment: usize,
    amount: String,
    installment_status: &'static str,
    due_date: String,
    payment_date: Option<String>,
}

/// Writes agreement snapshots as CSV.
pub struct AgreementWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> AgreementWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_agreements<'a>(
        &mut self,
        agreements: impl IntoIterator<Item = &'a Agreement>,
    ) -> Result<()> {
        for agreement in agreements {
            for (index, installment) in agreement.schedule.iter().enumerate() {
                self.writer.serialize(InstallmentRow {
                    agreement: agreement.id.as_str(),
                    user: &agreement.user_id,
                    cart: &agreement.cart_id,
                    total: agreement.total_amount.to_string(),
                    agreement_status: agreement.status.as_str(),
                    installment: index + 1,
                    amount: installment.amount.to_string(),
                    installment_status: installment.status.as_str(),
                    due_date: installment.due_date.to_rfc3339(),
                    payment_date: installment.payment_date.map(|d| d.to_rfc3339()),
                })?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agreement::{AgreementId, InstallmentStatus};
    use crate::domain::money::Amount;
    use crate::domain::schedule::compute_schedule;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn test_writes_one_row_per_installment() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let total = Amount::new(dec!(120.00)).unwrap();
        let mut agreement = Agreement::new(
            AgreementId::new("PL-000001-U001"),
            "U001",
            "C001",
            total,
            compute_schedule(total, 3, start),
        );
        agreement.schedule[0].status = InstallmentStatus::Paid;
        agreement.schedule[0].payment_date = Some(start);

        let mut buffer = Vec::new();
        AgreementWriter::new(&mut buffer)
            .write_agreements([&agreement])
            .unwrap();
        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(
            lines[0],
            "agreement,user,cart,total,agreement_status,installment,amount,installment_status,due_date,payment_date"
        );
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("PL-000001-U001,U001,C001,120.00,ACTIVE,1,40.00,PAID,"));
        assert!(lines[2].starts_with("PL-000001-U001,U001,C001,120.00,ACTIVE,2,40.00,UPCOMING,"));
        assert!(lines[3].ends_with(','));
    }
}
