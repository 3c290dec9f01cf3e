use crate::model::VoucherType;
use chrono::NaiveDate;
use rand::Rng;

/// Voucher number `<CODE>-<YYMMDD>-<NNNN>`, e.g. `PV-261019-0427`
///
/// The four digits are random; numbers are meant to be readable, not unique.
pub fn voucher_number<R: Rng + ?Sized>(voucher_type: VoucherType, date: NaiveDate, rng: &mut R) -> String {
    format!(
        "{}-{}-{:04}",
        voucher_type.code(),
        date.format("%y%m%d"),
        rng.gen_range(0..10_000u32)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_voucher_number_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        for vt in VoucherType::ALL {
            let number = voucher_number(vt, date, &mut rng);
            let parts: Vec<&str> = number.split('-').collect();
            assert_eq!(parts.len(), 3);
            assert_eq!(parts[0], vt.code());
            assert_eq!(parts[1], "261019");
            assert_eq!(parts[2].len(), 4);
            assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_same_seed_same_number() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let a = voucher_number(VoucherType::PettyCash, date, &mut StdRng::seed_from_u64(42));
        let b = voucher_number(VoucherType::PettyCash, date, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        assert!(a.starts_with("PCV-260105-"));
    }
}
