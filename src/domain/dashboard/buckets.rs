use std::collections::BTreeMap;

/// Monthly-consumption range in kWh. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConsumptionRange {
    UpTo200,
    From200To500,
    From500To1000,
    From1000To5000,
    Above5000,
}

impl ConsumptionRange {
    pub const ALL: [ConsumptionRange; 5] = [
        ConsumptionRange::UpTo200,
        ConsumptionRange::From200To500,
        ConsumptionRange::From500To1000,
        ConsumptionRange::From1000To5000,
        ConsumptionRange::Above5000,
    ];

    pub fn for_value(kwh: f64) -> Self {
        if kwh < 200.0 {
            Self::UpTo200
        } else if kwh < 500.0 {
            Self::From200To500
        } else if kwh < 1000.0 {
            Self::From500To1000
        } else if kwh < 5000.0 {
            Self::From1000To5000
        } else {
            Self::Above5000
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::UpTo200 => "0-200",
            Self::From200To500 => "200-500",
            Self::From500To1000 => "500-1000",
            Self::From1000To5000 => "1000-5000",
            Self::Above5000 => "5000+",
        }
    }
}

/// Count values per range. Every range is present, in ascending order.
pub fn bucket_consumption(values: &[f64]) -> Vec<(ConsumptionRange, u64)> {
    let mut counts: BTreeMap<ConsumptionRange, u64> =
        ConsumptionRange::ALL.iter().map(|r| (*r, 0)).collect();
    for value in values {
        *counts.entry(ConsumptionRange::for_value(*value)).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_bounds_are_inclusive() {
        assert_eq!(ConsumptionRange::for_value(0.0), ConsumptionRange::UpTo200);
        assert_eq!(ConsumptionRange::for_value(199.99), ConsumptionRange::UpTo200);
        assert_eq!(ConsumptionRange::for_value(200.0), ConsumptionRange::From200To500);
        assert_eq!(ConsumptionRange::for_value(1000.0), ConsumptionRange::From1000To5000);
        assert_eq!(ConsumptionRange::for_value(5000.0), ConsumptionRange::Above5000);
    }

    #[test]
    fn buckets_include_empty_ranges() {
        let buckets = bucket_consumption(&[150.0, 200.0, 450.0, 9000.0]);
        let labels: Vec<_> = buckets.iter().map(|(r, c)| (r.label(), *c)).collect();
        assert_eq!(
            labels,
            vec![
                ("0-200", 1),
                ("200-500", 2),
                ("500-1000", 0),
                ("1000-5000", 0),
                ("5000+", 1),
            ]
        );
    }

    #[test]
    fn no_values_yield_all_zero_buckets() {
        assert!(bucket_consumption(&[]).iter().all(|(_, c)| *c == 0));
        assert_eq!(bucket_consumption(&[]).len(), 5);
    }
}
