// src/services/dashboard_service.rs

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::db::dashboard_repo::{AgentPerformanceRow, DirectorKpiRow};
use crate::db::DashboardRepository;
use crate::middleware::rbac::offer_scope;
use crate::models::auth::User;
use crate::models::dashboard::{
    AgentPerformance, DashboardStats, DirectorKpis, FollowUpDiscipline, LostReasonEntry,
    MonthlyRevenueEntry, PipelineDistribution,
};
use crate::models::offer::OfferStatus;

// Nomes dos meses na língua do produto, para o gráfico de receita
const MONTH_NAMES: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran",
    "Temmuz", "Ağustos", "Eylül", "Ekim", "Kasım", "Aralık",
];

// Uma casa decimal, arredondamento comercial
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// Percentual inteiro arredondado; divisor zero vira zero
fn percent(part: i64, total: i64) -> i64 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as i64
}

pub fn kpis_from_row(row: &DirectorKpiRow) -> DirectorKpis {
    let closed = row.approved_count + row.lost_count;
    let win_rate = if closed > 0 {
        round1((row.approved_count as f64 / closed as f64) * 100.0)
    } else {
        0.0
    };

    DirectorKpis {
        total_pipeline_value: row.pipeline_value,
        approved_revenue: row.approved_revenue,
        win_rate,
        overdue_follow_ups: row.overdue_follow_ups,
        average_closing_days: round1(row.avg_closing_days.unwrap_or(0.0)),
    }
}

// Win rate do vendedor sobre TODAS as ofertas dele, não só as fechadas.
// É uma régua mais dura de propósito: oferta parada também pesa contra.
pub fn agent_from_row(row: &AgentPerformanceRow) -> AgentPerformance {
    let win_rate = if row.offers > 0 {
        round1((row.approved as f64 / row.offers as f64) * 100.0)
    } else {
        0.0
    };

    AgentPerformance {
        user_id: row.user_id,
        name: row.name.clone(),
        offers: row.offers,
        approved: row.approved,
        win_rate,
        revenue: row.revenue,
        avg_close_days: round1(row.avg_closing_days.unwrap_or(0.0)),
    }
}

// Sem ofertas abertas o placar é 100/0: não há follow-up para atrasar
pub fn discipline_from_counts(on_time: i64, late: i64) -> FollowUpDiscipline {
    let total = on_time + late;
    if total == 0 {
        return FollowUpDiscipline { on_time: 100, late: 0 };
    }
    FollowUpDiscipline {
        on_time: percent(on_time, total),
        late: percent(late, total),
    }
}

#[derive(Clone)]
pub struct DashboardService {
    dashboard_repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(dashboard_repo: DashboardRepository) -> Self {
        Self { dashboard_repo }
    }

    // Cards do topo. Sales vê só a própria carteira; admin e müdür, o hotel.
    pub async fn stats(&self, user: &User) -> Result<DashboardStats, AppError> {
        let scope = offer_scope(user).agent_filter();
        let today = Utc::now().date_naive();
        self.dashboard_repo.stats(user.hotel_id, scope, today).await
    }

    // --- PAINEL DA DIRETORIA ---

    pub async fn director_kpis(&self, hotel_id: Uuid) -> Result<DirectorKpis, AppError> {
        let row = self.dashboard_repo.director_kpis(hotel_id).await?;
        Ok(kpis_from_row(&row))
    }

    // Os cinco estados sempre presentes na resposta, mesmo zerados
    pub async fn pipeline(&self, hotel_id: Uuid) -> Result<PipelineDistribution, AppError> {
        let counts = self.dashboard_repo.pipeline_counts(hotel_id).await?;

        let mut pipeline = PipelineDistribution {
            sent: 0,
            waiting: 0,
            revised: 0,
            approved: 0,
            lost: 0,
        };
        for entry in counts {
            match entry.status {
                OfferStatus::Sent => pipeline.sent = entry.count,
                OfferStatus::Waiting => pipeline.waiting = entry.count,
                OfferStatus::Revised => pipeline.revised = entry.count,
                OfferStatus::Approved => pipeline.approved = entry.count,
                OfferStatus::Lost => pipeline.lost = entry.count,
            }
        }
        Ok(pipeline)
    }

    // Doze entradas fixas, janeiro a dezembro, meses sem venda zerados
    pub async fn monthly_revenue(
        &self,
        hotel_id: Uuid,
        year: Option<i32>,
    ) -> Result<Vec<MonthlyRevenueEntry>, AppError> {
        let year = year.unwrap_or_else(|| Utc::now().year());
        let rows = self.dashboard_repo.monthly_revenue(hotel_id, year).await?;

        let revenue = MONTH_NAMES
            .iter()
            .enumerate()
            .map(|(idx, month)| {
                let amount = rows
                    .iter()
                    .find(|r| r.month_num == (idx + 1) as i32)
                    .map(|r| r.total)
                    .unwrap_or(Decimal::ZERO);
                MonthlyRevenueEntry {
                    month: (*month).to_string(),
                    amount,
                }
            })
            .collect();

        Ok(revenue)
    }

    pub async fn agent_performance(
        &self,
        hotel_id: Uuid,
    ) -> Result<Vec<AgentPerformance>, AppError> {
        let rows = self.dashboard_repo.agent_performance(hotel_id).await?;
        Ok(rows.iter().map(agent_from_row).collect())
    }

    pub async fn lost_reasons(&self, hotel_id: Uuid) -> Result<Vec<LostReasonEntry>, AppError> {
        self.dashboard_repo.lost_reasons(hotel_id).await
    }

    pub async fn followup_discipline(
        &self,
        hotel_id: Uuid,
    ) -> Result<FollowUpDiscipline, AppError> {
        let today = Utc::now().date_naive();
        let (on_time, late) = self.dashboard_repo.followup_counts(hotel_id, today).await?;
        Ok(discipline_from_counts(on_time, late))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kpi_row(approved: i64, lost: i64, avg_days: Option<f64>) -> DirectorKpiRow {
        DirectorKpiRow {
            pipeline_value: Decimal::new(500_000, 0),
            approved_revenue: Decimal::new(250_000, 0),
            approved_count: approved,
            lost_count: lost,
            overdue_follow_ups: 2,
            avg_closing_days: avg_days,
        }
    }

    #[test]
    fn win_rate_considera_so_ofertas_fechadas() {
        // 2 aprovadas, 1 perdida: 2/3 = 66.666... vira 66.7
        let kpis = kpis_from_row(&kpi_row(2, 1, None));
        assert_eq!(kpis.win_rate, 66.7);
    }

    #[test]
    fn win_rate_sem_ofertas_fechadas_e_zero() {
        let kpis = kpis_from_row(&kpi_row(0, 0, None));
        assert_eq!(kpis.win_rate, 0.0);
    }

    #[test]
    fn dias_de_fechamento_arredondam_para_uma_casa() {
        let kpis = kpis_from_row(&kpi_row(1, 0, Some(12.34)));
        assert_eq!(kpis.average_closing_days, 12.3);

        let kpis = kpis_from_row(&kpi_row(1, 0, None));
        assert_eq!(kpis.average_closing_days, 0.0);
    }

    #[test]
    fn win_rate_do_vendedor_usa_o_total_de_ofertas() {
        // 1 aprovada em 4 ofertas (2 ainda abertas): 25%, não 50%
        let row = AgentPerformanceRow {
            user_id: Uuid::new_v4(),
            name: "Mehmet".into(),
            offers: 4,
            approved: 1,
            revenue: Decimal::new(80_000, 0),
            avg_closing_days: Some(6.49),
        };
        let agent = agent_from_row(&row);
        assert_eq!(agent.win_rate, 25.0);
        assert_eq!(agent.avg_close_days, 6.5);
    }

    #[test]
    fn vendedor_sem_ofertas_fica_zerado() {
        let row = AgentPerformanceRow {
            user_id: Uuid::new_v4(),
            name: "Yeni".into(),
            offers: 0,
            approved: 0,
            revenue: Decimal::ZERO,
            avg_closing_days: None,
        };
        let agent = agent_from_row(&row);
        assert_eq!(agent.win_rate, 0.0);
        assert_eq!(agent.avg_close_days, 0.0);
    }

    #[test]
    fn disciplina_arredonda_os_percentuais() {
        // 2 em dia, 1 atrasada: 66.67% e 33.33% viram 67 e 33
        let score = discipline_from_counts(2, 1);
        assert_eq!(score.on_time, 67);
        assert_eq!(score.late, 33);
    }

    #[test]
    fn disciplina_sem_ofertas_abertas_e_cem_por_cento() {
        let score = discipline_from_counts(0, 0);
        assert_eq!(score.on_time, 100);
        assert_eq!(score.late, 0);
    }
}
