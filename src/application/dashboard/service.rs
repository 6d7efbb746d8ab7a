use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;
use tracing::debug;

use super::reports::*;
use crate::domain::dashboard::{bucket_consumption, day_key, start_of_month, SalesPeriod};
use crate::domain::{CustomerStatus, DomainError, DomainResult, RepositoryProvider};
use crate::shared::{percentage, ratio_or_zero};

/// Annual savings per unit of monthly bill: 12 months at 90% offset.
const ANNUAL_SAVINGS_FACTOR: f64 = 12.0 * 0.9;
const CONVERSION_TARGET: f64 = 0.3;
const AVERAGE_CONVERSION_DAYS: u32 = 15;
const RESPONSE_RATE: f64 = 0.65;
const AVERAGE_ROI_YEARS: f64 = 4.2;
const CO2_TONS_PER_CURRENCY: f64 = 0.0005;
const TREES_PER_CURRENCY: f64 = 0.01;
const TOP_CITIES: usize = 5;

pub const DEFAULT_TIMELINE_DAYS: u32 = 30;
pub const MAX_TIMELINE_DAYS: u32 = 3650;

pub struct DashboardService {
    repos: Arc<dyn RepositoryProvider>,
}

impl DashboardService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn overview(&self) -> DomainResult<OverviewReport> {
        let customers = self.repos.customers();
        let now = Utc::now();

        let total_customers = customers.count(None).await?;
        let active_clients = customers.count(Some(CustomerStatus::Client)).await?;
        let total_leads = customers.count(Some(CustomerStatus::Lead)).await?;
        let total_prospects = customers.count(Some(CustomerStatus::Prospect)).await?;
        let total_energy_potential = customers.sum_consumption().await?;
        let total_monthly_bills = customers.sum_bills(&[]).await?;
        let new_customers_this_month = customers.count_created_since(start_of_month(now)).await?;

        Ok(OverviewReport {
            total_customers,
            active_clients,
            total_leads,
            total_prospects,
            conversion_rate: percentage(active_clients, total_customers),
            total_energy_potential,
            total_monthly_bills,
            new_customers_this_month,
            average_ticket: ratio_or_zero(total_monthly_bills, active_clients as f64),
        })
    }

    /// Sales metrics over a trailing window. `period` defaults to `month`.
    pub async fn sales(&self, period: Option<&str>) -> DomainResult<SalesReport> {
        let customers = self.repos.customers();
        let window = SalesPeriod::from_query(period);
        let since = window.window_start(Utc::now());
        debug!(period = window.as_str(), %since, "Computing sales metrics");

        let mut per_day: BTreeMap<(String, CustomerStatus), u64> = BTreeMap::new();
        for customer in customers.created_since(since).await? {
            *per_day
                .entry((day_key(customer.created_at), customer.status))
                .or_insert(0) += 1;
        }

        let open_bills = customers
            .sum_bills(&[CustomerStatus::Lead, CustomerStatus::Prospect])
            .await?;
        let client_bills = customers.sum_bills(&[CustomerStatus::Client]).await?;

        Ok(SalesReport {
            period: period.unwrap_or(SalesPeriod::Month.as_str()).to_string(),
            timeline: per_day
                .into_iter()
                .map(|((date, status), count)| SalesDay { date, status, count })
                .collect(),
            sales_potential: open_bills * ANNUAL_SAVINGS_FACTOR,
            realized_sales: client_bills * ANNUAL_SAVINGS_FACTOR,
            conversion_target: CONVERSION_TARGET,
        })
    }

    pub async fn performance(&self) -> DomainResult<PerformanceReport> {
        let conversion_by_type = self
            .repos
            .customers()
            .count_by_type_and_status()
            .await?
            .into_iter()
            .map(|row| TypeStatusShare {
                installation_type: row.installation_type,
                status: row.status,
                count: row.count,
            })
            .collect();

        Ok(PerformanceReport {
            conversion_by_type,
            average_conversion_time: AVERAGE_CONVERSION_DAYS,
            response_rate: RESPONSE_RATE * 100.0,
            lead_quality: LeadQuality {
                hot: 35,
                warm: 45,
                cold: 20,
            },
            simulated: true,
        })
    }

    pub async fn geographic(&self) -> DomainResult<GeographicReport> {
        let customers = self.repos.customers();

        let by_city: Vec<CityShare> = customers
            .distribution_by_city()
            .await?
            .into_iter()
            .map(|row| CityShare {
                city: row.city,
                state: row.state,
                count: row.count,
                avg_consumption: row.avg_consumption,
            })
            .collect();
        let by_state = customers
            .distribution_by_state()
            .await?
            .into_iter()
            .map(|row| StateShare {
                state: row.state,
                count: row.count,
            })
            .collect();

        Ok(GeographicReport {
            top_cities: by_city.iter().take(TOP_CITIES).cloned().collect(),
            by_city,
            by_state,
        })
    }

    /// Daily activity over the last `days` days (default 30, at most
    /// [`MAX_TIMELINE_DAYS`]), oldest first.
    ///
    /// Only days with at least one new customer appear. Contact, proposal
    /// and contract counts are random placeholders.
    pub async fn timeline(&self, days: Option<u32>) -> DomainResult<TimelineReport> {
        let days = days.unwrap_or(DEFAULT_TIMELINE_DAYS);
        let window_too_long = || {
            DomainError::Validation(format!("days must be at most {}", MAX_TIMELINE_DAYS))
        };
        if days > MAX_TIMELINE_DAYS {
            return Err(window_too_long());
        }
        let since = Utc::now()
            .checked_sub_signed(Duration::days(i64::from(days)))
            .ok_or_else(window_too_long)?;

        let mut per_day: BTreeMap<String, u64> = BTreeMap::new();
        for customer in self.repos.customers().created_since(since).await? {
            *per_day.entry(day_key(customer.created_at)).or_insert(0) += 1;
        }

        let mut rng = rand::thread_rng();
        let timeline: Vec<TimelineDay> = per_day
            .into_iter()
            .map(|(date, new_customers)| TimelineDay {
                date,
                new_customers,
                contacts_made: rng.gen_range(5..15),
                proposals_sent: rng.gen_range(1..6),
                contracts_closed: rng.gen_range(0..3),
            })
            .collect();

        let summary = TimelineSummary {
            total_new_customers: timeline.iter().map(|d| d.new_customers).sum(),
            total_contacts: timeline.iter().map(|d| u64::from(d.contacts_made)).sum(),
            total_proposals: timeline.iter().map(|d| u64::from(d.proposals_sent)).sum(),
            total_contracts: timeline.iter().map(|d| u64::from(d.contracts_closed)).sum(),
        };

        Ok(TimelineReport {
            period: format!("{} days", days),
            timeline,
            summary,
            simulated: true,
        })
    }

    pub async fn conversion(&self) -> DomainResult<ConversionReport> {
        let mut funnel = Funnel::default();
        for row in self.repos.customers().count_by_status().await? {
            match row.status {
                CustomerStatus::Lead => funnel.leads = row.count,
                CustomerStatus::Prospect => funnel.prospects = row.count,
                CustomerStatus::Client => funnel.clients = row.count,
                CustomerStatus::Inactive => funnel.inactive = row.count,
            }
        }

        let conversion_rates = ConversionRates {
            lead_to_prospect: percentage(funnel.prospects, funnel.leads),
            prospect_to_client: percentage(funnel.clients, funnel.prospects),
            overall_conversion: percentage(funnel.clients, funnel.total()),
        };

        Ok(ConversionReport {
            lost_opportunities: funnel.inactive,
            funnel,
            conversion_rates,
        })
    }

    pub async fn energy(&self) -> DomainResult<EnergyReport> {
        let customers = self.repos.customers();

        let by_installation_type = customers
            .energy_by_installation_type()
            .await?
            .into_iter()
            .map(|row| InstallationEnergyShare {
                installation_type: row.installation_type,
                avg_consumption: row.avg_consumption,
                total_consumption: row.total_consumption,
                avg_bill: row.avg_bill,
                count: row.count,
            })
            .collect();

        let consumption_distribution = bucket_consumption(&customers.consumption_values().await?)
            .into_iter()
            .map(|(range, count)| ConsumptionBucket {
                consumption_range: range.label().to_string(),
                count,
            })
            .collect();

        let total_savings_potential = customers.sum_bills(&[]).await? * ANNUAL_SAVINGS_FACTOR;

        Ok(EnergyReport {
            by_installation_type,
            consumption_distribution,
            total_savings_potential,
            average_roi: AVERAGE_ROI_YEARS,
            sustainability_impact: SustainabilityImpact {
                co2_reduction_tons: total_savings_potential * CO2_TONS_PER_CURRENCY,
                trees_equivalent: total_savings_potential * TREES_PER_CURRENCY,
            },
            simulated: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Customer, CustomerType, InstallationType};
    use crate::infrastructure::InMemoryRepositoryProvider;
    use chrono::{DateTime, Utc};

    fn sample_customer(
        email: &str,
        status: CustomerStatus,
        consumption: Option<f64>,
        bill: Option<f64>,
        created_at: DateTime<Utc>,
    ) -> Customer {
        Customer {
            id: uuid::Uuid::new_v4().to_string(),
            name: email.to_string(),
            email: email.to_string(),
            phone: "0".into(),
            cpf_cnpj: None,
            address: "Rua X".into(),
            city: "Fortaleza".into(),
            state: "CE".into(),
            zip_code: "60000-000".into(),
            complement: None,
            installation_type: InstallationType::Residential,
            customer_type: CustomerType::Consumer,
            monthly_energy_consumption: consumption,
            monthly_energy_bill: bill,
            roof_type: None,
            available_roof_area: None,
            status,
            notes: None,
            created_at,
            updated_at: created_at,
            last_contact_date: None,
        }
    }

    fn seeded(customers: Vec<Customer>) -> DashboardService {
        let repos = InMemoryRepositoryProvider::new();
        for customer in customers {
            repos.customers.insert(customer).unwrap();
        }
        DashboardService::new(Arc::new(repos))
    }

    fn funnel_fixture() -> DashboardService {
        let now = Utc::now();
        seeded(vec![
            sample_customer("l1@x.com", CustomerStatus::Lead, Some(150.0), Some(100.0), now),
            sample_customer("l2@x.com", CustomerStatus::Lead, None, None, now),
            sample_customer("p1@x.com", CustomerStatus::Prospect, Some(450.0), Some(200.0), now),
            sample_customer("c1@x.com", CustomerStatus::Client, Some(6000.0), Some(500.0), now),
            sample_customer("i1@x.com", CustomerStatus::Inactive, None, Some(50.0), now),
        ])
    }

    #[tokio::test]
    async fn empty_store_yields_zero_reports() {
        let svc = seeded(vec![]);

        let overview = svc.overview().await.unwrap();
        assert_eq!(overview.total_customers, 0);
        assert_eq!(overview.conversion_rate, 0.0);
        assert_eq!(overview.average_ticket, 0.0);

        let conversion = svc.conversion().await.unwrap();
        assert_eq!(conversion.conversion_rates.overall_conversion, 0.0);
        assert_eq!(conversion.lost_opportunities, 0);

        let geo = svc.geographic().await.unwrap();
        assert!(geo.by_city.is_empty() && geo.top_cities.is_empty());

        let timeline = svc.timeline(None).await.unwrap();
        assert!(timeline.timeline.is_empty());
        assert_eq!(timeline.summary.total_contacts, 0);
        assert_eq!(timeline.period, "30 days");
    }

    #[tokio::test]
    async fn overview_counts_and_rates() {
        let svc = funnel_fixture();
        let overview = svc.overview().await.unwrap();

        assert_eq!(overview.total_customers, 5);
        assert_eq!(overview.active_clients, 1);
        assert_eq!(overview.total_leads, 2);
        assert_eq!(overview.total_prospects, 1);
        assert_eq!(overview.conversion_rate, 20.0);
        assert_eq!(overview.total_energy_potential, 6600.0);
        assert_eq!(overview.total_monthly_bills, 850.0);
        assert_eq!(overview.average_ticket, 850.0);
        assert_eq!(overview.new_customers_this_month, 5);
    }

    #[tokio::test]
    async fn new_this_month_excludes_older_customers() {
        let old = start_of_month(Utc::now()) - Duration::days(3);
        let svc = seeded(vec![
            sample_customer("old@x.com", CustomerStatus::Lead, None, None, old),
            sample_customer("new@x.com", CustomerStatus::Lead, None, None, Utc::now()),
        ]);
        assert_eq!(svc.overview().await.unwrap().new_customers_this_month, 1);
    }

    #[tokio::test]
    async fn conversion_rates_use_funnel_stages() {
        let conversion = funnel_fixture().conversion().await.unwrap();

        assert_eq!(
            conversion.funnel,
            Funnel {
                leads: 2,
                prospects: 1,
                clients: 1,
                inactive: 1
            }
        );
        assert_eq!(conversion.conversion_rates.lead_to_prospect, 50.0);
        assert_eq!(conversion.conversion_rates.prospect_to_client, 100.0);
        assert_eq!(conversion.conversion_rates.overall_conversion, 20.0);
        assert_eq!(conversion.lost_opportunities, 1);
    }

    #[tokio::test]
    async fn sales_windows_and_potentials() {
        let now = Utc::now();
        let svc = seeded(vec![
            sample_customer("a@x.com", CustomerStatus::Lead, None, Some(100.0), now),
            sample_customer("b@x.com", CustomerStatus::Client, None, Some(200.0), now),
            sample_customer(
                "c@x.com",
                CustomerStatus::Prospect,
                None,
                None,
                now - Duration::days(20),
            ),
        ]);

        let month = svc.sales(None).await.unwrap();
        assert_eq!(month.period, "month");
        assert_eq!(month.timeline.iter().map(|d| d.count).sum::<u64>(), 3);
        assert!((month.sales_potential - 1080.0).abs() < 1e-9);
        assert!((month.realized_sales - 2160.0).abs() < 1e-9);
        assert_eq!(month.conversion_target, 0.3);

        let week = svc.sales(Some("week")).await.unwrap();
        assert_eq!(week.timeline.iter().map(|d| d.count).sum::<u64>(), 2);

        let unknown = svc.sales(Some("fortnight")).await.unwrap();
        assert!(unknown.timeline.is_empty());
        assert_eq!(unknown.period, "fortnight");
    }

    #[tokio::test]
    async fn timeline_groups_by_day_ascending() {
        let now = Utc::now();
        let svc = seeded(vec![
            sample_customer("a@x.com", CustomerStatus::Lead, None, None, now - Duration::days(2)),
            sample_customer("b@x.com", CustomerStatus::Lead, None, None, now - Duration::days(2)),
            sample_customer("c@x.com", CustomerStatus::Lead, None, None, now),
            sample_customer("d@x.com", CustomerStatus::Lead, None, None, now - Duration::days(40)),
        ]);

        let report = svc.timeline(Some(7)).await.unwrap();
        assert_eq!(report.period, "7 days");
        assert_eq!(report.timeline.len(), 2);
        assert!(report.timeline[0].date < report.timeline[1].date);
        assert_eq!(report.timeline[0].new_customers, 2);
        assert_eq!(report.summary.total_new_customers, 3);
        assert!(report.simulated);

        for day in &report.timeline {
            assert!((5..=14).contains(&day.contacts_made));
            assert!((1..=5).contains(&day.proposals_sent));
            assert!(day.contracts_closed <= 2);
        }
        let contacts: u64 = report.timeline.iter().map(|d| u64::from(d.contacts_made)).sum();
        assert_eq!(report.summary.total_contacts, contacts);
    }

    #[tokio::test]
    async fn timeline_rejects_windows_past_the_limit() {
        let svc = seeded(vec![]);

        let longest = svc.timeline(Some(MAX_TIMELINE_DAYS)).await.unwrap();
        assert_eq!(longest.period, format!("{} days", MAX_TIMELINE_DAYS));

        for days in [MAX_TIMELINE_DAYS + 1, 100_000_000, u32::MAX] {
            let err = svc.timeline(Some(days)).await.unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "days={days}");
        }
    }

    #[tokio::test]
    async fn energy_buckets_and_impact() {
        let report = funnel_fixture().energy().await.unwrap();

        let buckets: Vec<(&str, u64)> = report
            .consumption_distribution
            .iter()
            .map(|b| (b.consumption_range.as_str(), b.count))
            .collect();
        assert_eq!(
            buckets,
            vec![
                ("0-200", 1),
                ("200-500", 1),
                ("500-1000", 0),
                ("1000-5000", 0),
                ("5000+", 1),
            ]
        );

        // 850 in bills * 12 * 0.9
        assert!((report.total_savings_potential - 9180.0).abs() < 1e-9);
        assert!((report.sustainability_impact.co2_reduction_tons - 4.59).abs() < 1e-9);
        assert!((report.sustainability_impact.trees_equivalent - 91.8).abs() < 1e-9);
        assert_eq!(report.average_roi, 4.2);

        let residential = &report.by_installation_type[0];
        assert_eq!(residential.count, 3);
        assert_eq!(residential.total_consumption, 6600.0);
    }

    #[tokio::test]
    async fn geographic_top_cities_capped_at_five() {
        let now = Utc::now();
        let customers = (0..7)
            .map(|i| {
                let mut c = sample_customer(
                    &format!("c{}@x.com", i),
                    CustomerStatus::Lead,
                    Some(100.0 * (i + 1) as f64),
                    None,
                    now,
                );
                c.city = format!("City {}", i);
                c
            })
            .collect();
        let geo = seeded(customers).geographic().await.unwrap();

        assert_eq!(geo.by_city.len(), 7);
        assert_eq!(geo.top_cities.len(), 5);
        assert_eq!(geo.by_state, vec![StateShare { state: "CE".into(), count: 7 }]);
    }

    #[tokio::test]
    async fn performance_flags_placeholders() {
        let report = funnel_fixture().performance().await.unwrap();
        assert!(report.simulated);
        assert_eq!(report.average_conversion_time, 15);
        assert_eq!(report.response_rate, 65.0);
        assert_eq!(report.lead_quality, LeadQuality { hot: 35, warm: 45, cold: 20 });
        assert_eq!(report.conversion_by_type.iter().map(|r| r.count).sum::<u64>(), 5);
    }
}
