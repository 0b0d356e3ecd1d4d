// src/services/report_service.rs

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::db::ReportRepository;
use crate::models::report::{DateRange, PeriodReport, ReportPeriod};

// Resolve o período pedido para uma janela SEMIABERTA [start, end) em UTC.
// Semana começa na segunda-feira; domingo ainda pertence à semana corrente.
pub fn resolve_range(period: ReportPeriod, today: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let (start_date, end_date) = match period {
        ReportPeriod::Weekly => {
            let monday = today.week(Weekday::Mon).first_day();
            (monday, monday + chrono::Duration::days(7))
        }
        ReportPeriod::Monthly => {
            let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
                .unwrap_or(today);
            let next = if today.month() == 12 {
                NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
            }
            .unwrap_or(first);
            (first, next)
        }
        ReportPeriod::Yearly => {
            let first = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
            let next = NaiveDate::from_ymd_opt(today.year() + 1, 1, 1).unwrap_or(first);
            (first, next)
        }
    };

    (
        start_date.and_time(NaiveTime::MIN).and_utc(),
        end_date.and_time(NaiveTime::MIN).and_utc(),
    )
}

// Relatórios consolidados por período, para admin e müdür
#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
}

impl ReportService {
    pub fn new(report_repo: ReportRepository) -> Self {
        Self { report_repo }
    }

    pub async fn generate(
        &self,
        hotel_id: Uuid,
        period: ReportPeriod,
    ) -> Result<PeriodReport, AppError> {
        let today = Utc::now().date_naive();
        let (start, end) = resolve_range(period, today);

        let data = self.report_repo.collect(hotel_id, start, end).await?;

        Ok(PeriodReport {
            period: period.as_str().to_string(),
            date_range: DateRange { start, end },
            total_offers: data.totals.total_offers,
            approved_offers: data.totals.approved_offers,
            pending_offers: data.totals.pending_offers,
            lost_offers: data.totals.lost_offers,
            revenue_by_currency: data.revenue_by_currency,
            potential_revenue_by_currency: data.potential_revenue_by_currency,
            avg_offer_value_by_currency: data.avg_offer_value_by_currency,
            status_breakdown: data.status_breakdown,
            top_agents: data.top_agents,
            top_companies: data.top_companies,
            total_guests: data.totals.total_guests,
            total_rooms: data.totals.total_rooms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn semana_comeca_na_segunda_e_dura_sete_dias() {
        // 17/09/2025 é uma quarta-feira
        let (start, end) = resolve_range(ReportPeriod::Weekly, day(2025, 9, 17));
        assert_eq!(start.date_naive(), day(2025, 9, 15));
        assert_eq!(end.date_naive(), day(2025, 9, 22));
    }

    #[test]
    fn segunda_feira_abre_a_propria_semana() {
        let (start, end) = resolve_range(ReportPeriod::Weekly, day(2025, 9, 15));
        assert_eq!(start.date_naive(), day(2025, 9, 15));
        assert_eq!(end.date_naive(), day(2025, 9, 22));
    }

    #[test]
    fn domingo_pertence_a_semana_que_termina() {
        // 21/09/2025 é domingo: ainda conta na semana de 15/09
        let (start, _) = resolve_range(ReportPeriod::Weekly, day(2025, 9, 21));
        assert_eq!(start.date_naive(), day(2025, 9, 15));
    }

    #[test]
    fn mes_vai_do_dia_um_ao_dia_um_seguinte() {
        let (start, end) = resolve_range(ReportPeriod::Monthly, day(2025, 9, 17));
        assert_eq!(start.date_naive(), day(2025, 9, 1));
        assert_eq!(end.date_naive(), day(2025, 10, 1));
    }

    #[test]
    fn dezembro_vira_para_janeiro_do_ano_seguinte() {
        let (start, end) = resolve_range(ReportPeriod::Monthly, day(2025, 12, 31));
        assert_eq!(start.date_naive(), day(2025, 12, 1));
        assert_eq!(end.date_naive(), day(2026, 1, 1));
    }

    #[test]
    fn ano_inteiro_em_janela_semiaberta() {
        let (start, end) = resolve_range(ReportPeriod::Yearly, day(2025, 6, 15));
        assert_eq!(start.date_naive(), day(2025, 1, 1));
        assert_eq!(end.date_naive(), day(2026, 1, 1));
    }

    #[test]
    fn periodo_desconhecido_nao_passa_no_parse() {
        assert!(ReportPeriod::parse("weekly").is_some());
        assert!(ReportPeriod::parse("monthly").is_some());
        assert!(ReportPeriod::parse("yearly").is_some());
        assert!(ReportPeriod::parse("daily").is_none());
        assert!(ReportPeriod::parse("").is_none());
    }
}
