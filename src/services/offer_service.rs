// src/services/offer_service.rs

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::db::offer_repo::OfferFilters;
use crate::db::{CompanyRepository, OfferRepository};
use crate::middleware::rbac::{can_edit_offer, offer_scope, OfferScope};
use crate::models::auth::User;
use crate::models::offer::{
    CreateOfferPayload, Note, NoteWithAuthor, Offer, OfferStatus, OfferWithDetails,
    UpdateOfferPayload,
};

// Colunas do CSV, na ordem em que o Excel da equipe espera
const CSV_HEADERS: [&str; 17] = [
    "ID",
    "Firma",
    "Tür",
    "Durum",
    "Kayıp Sebebi",
    "Giriş Tarihi",
    "Çıkış Tarihi",
    "Kişi Sayısı",
    "Oda Sayısı",
    "Salon",
    "Takip Tarihi",
    "Temsilci",
    "Fiyat",
    "Tutar",
    "Para Birimi",
    "Oluşturma Tarihi",
    "Onay Tarihi",
];

// BOM UTF-8: sem ele o Excel lê os caracteres turcos errado
const UTF8_BOM: char = '\u{FEFF}';

// Transição para 'approved' carimba a data; qualquer outra transição
// preserva o carimbo existente (inclusive sair de approved).
pub fn next_approved_at(
    current: &Offer,
    new_status: OfferStatus,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if new_status == OfferStatus::Approved && current.status != OfferStatus::Approved {
        Some(now)
    } else {
        current.approved_at
    }
}

fn csv_cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn opt_date(value: Option<NaiveDate>) -> String {
    value.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

fn opt_timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

// Monta o CSV completo em memória. Cabeçalho sem aspas; células de dados
// sempre entre aspas, com aspas internas dobradas.
pub fn offers_to_csv(offers: &[OfferWithDetails]) -> String {
    let mut lines = Vec::with_capacity(offers.len() + 1);
    lines.push(CSV_HEADERS.join(","));

    for offer in offers {
        let cells = [
            offer.id.to_string(),
            offer.company_name.clone(),
            offer.title.clone(),
            offer.status.as_str().to_string(),
            offer.lost_reason.clone().unwrap_or_default(),
            opt_date(offer.check_in_date),
            opt_date(offer.check_out_date),
            offer.guest_count.map(|n| n.to_string()).unwrap_or_default(),
            offer.room_count.map(|n| n.to_string()).unwrap_or_default(),
            offer.meeting_room.clone().unwrap_or_default(),
            offer.follow_up_date.format("%Y-%m-%d").to_string(),
            offer.agent_name.clone(),
            offer.price.clone().unwrap_or_default(),
            offer.amount.map(|a| a.to_string()).unwrap_or_default(),
            offer.currency.as_str().to_string(),
            opt_timestamp(Some(offer.created_at)),
            opt_timestamp(offer.approved_at),
        ];
        let row: Vec<String> = cells.iter().map(|c| csv_cell(c)).collect();
        lines.push(row.join(","));
    }

    format!("{}{}", UTF8_BOM, lines.join("\n"))
}

pub fn export_filename(today: NaiveDate) -> String {
    format!("teklifler-{}.csv", today.format("%Y-%m-%d"))
}

// O coração do funil: criação, edição por sobrescrita, notas e o export.
// O escopo por papel (sales só enxerga a própria carteira) é aplicado aqui.
#[derive(Clone)]
pub struct OfferService {
    offer_repo: OfferRepository,
    company_repo: CompanyRepository,
}

impl OfferService {
    pub fn new(offer_repo: OfferRepository, company_repo: CompanyRepository) -> Self {
        Self {
            offer_repo,
            company_repo,
        }
    }

    // Sales recebe a listagem restrita à própria carteira, ignorando
    // qualquer agentId que tenha vindo na query string
    pub async fn list(
        &self,
        user: &User,
        mut filters: OfferFilters,
    ) -> Result<Vec<OfferWithDetails>, AppError> {
        if let OfferScope::Agent(agent_id) = offer_scope(user) {
            filters.agent_id = Some(agent_id);
        }
        self.offer_repo.list(user.hotel_id, &filters).await
    }

    pub async fn create(
        &self,
        user: &User,
        payload: CreateOfferPayload,
    ) -> Result<OfferWithDetails, AppError> {
        // A firma precisa existir NO hotel do usuário
        self.company_repo
            .find_in_hotel(payload.company_id, user.hotel_id)
            .await?
            .ok_or(AppError::NotFound("Firma bulunamadı."))?;

        let offer = self
            .offer_repo
            .create(
                user.hotel_id,
                payload.company_id,
                user.id,
                &payload.title,
                payload.status,
                payload.price.as_deref(),
                payload.amount,
                payload.currency,
                payload.check_in_date,
                payload.check_out_date,
                payload.guest_count,
                payload.room_count,
                payload.meeting_room.as_deref(),
                payload.follow_up_date,
            )
            .await?;

        tracing::info!("📊 Nova oferta: {} ({})", offer.title, offer.id);

        self.offer_repo
            .find_with_details(offer.id, user.hotel_id)
            .await?
            .ok_or(AppError::NotFound("Teklif bulunamadı."))
    }

    // Sobrescrita completa dos campos editáveis. Oferta de outro hotel
    // responde 404; oferta de outro vendedor (para sales) responde 403.
    pub async fn update(
        &self,
        user: &User,
        offer_id: Uuid,
        payload: UpdateOfferPayload,
    ) -> Result<Offer, AppError> {
        let mut offer = self
            .offer_repo
            .find_in_hotel(offer_id, user.hotel_id)
            .await?
            .ok_or(AppError::NotFound("Teklif bulunamadı."))?;

        if !can_edit_offer(user, offer.agent_id) {
            return Err(AppError::Forbidden("Bu teklifi düzenleme yetkiniz yok"));
        }

        offer.approved_at = next_approved_at(&offer, payload.status, Utc::now());
        offer.status = payload.status;
        offer.follow_up_date = payload.follow_up_date;
        offer.price = payload.price;
        offer.amount = payload.amount;
        offer.currency = payload.currency;
        offer.check_in_date = payload.check_in_date;
        offer.check_out_date = payload.check_out_date;
        offer.guest_count = payload.guest_count;
        offer.room_count = payload.room_count;
        offer.meeting_room = payload.meeting_room;
        offer.lost_reason = payload.lost_reason;

        self.offer_repo
            .update(&offer)
            .await?
            .ok_or(AppError::NotFound("Teklif bulunamadı."))
    }

    // A autorização (só admin) fica no handler; as notas caem junto via CASCADE
    pub async fn delete(&self, user: &User, offer_id: Uuid) -> Result<(), AppError> {
        let deleted = self.offer_repo.delete(offer_id, user.hotel_id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Teklif bulunamadı."));
        }
        tracing::info!("🗑️ Oferta removida: {}", offer_id);
        Ok(())
    }

    // --- NOTAS ---

    pub async fn list_notes(
        &self,
        user: &User,
        offer_id: Uuid,
    ) -> Result<Vec<NoteWithAuthor>, AppError> {
        self.offer_repo
            .find_in_hotel(offer_id, user.hotel_id)
            .await?
            .ok_or(AppError::NotFound("Teklif bulunamadı."))?;

        self.offer_repo.list_notes(offer_id).await
    }

    pub async fn add_note(
        &self,
        user: &User,
        offer_id: Uuid,
        content: &str,
    ) -> Result<Note, AppError> {
        self.offer_repo
            .find_in_hotel(offer_id, user.hotel_id)
            .await?
            .ok_or(AppError::NotFound("Teklif bulunamadı."))?;

        self.offer_repo.add_note(offer_id, user.id, content).await
    }

    // --- EXPORT ---

    pub async fn export_csv(&self, user: &User) -> Result<String, AppError> {
        let scope = offer_scope(user).agent_filter();
        let offers = self.offer_repo.list_for_export(user.hotel_id, scope).await?;
        Ok(offers_to_csv(&offers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::offer::Currency;
    use rust_decimal::Decimal;

    fn offer_with_status(status: OfferStatus, approved_at: Option<DateTime<Utc>>) -> Offer {
        Offer {
            id: Uuid::new_v4(),
            hotel_id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            agent_id: Uuid::new_v4(),
            title: "Konaklama".into(),
            status,
            lost_reason: None,
            price: None,
            amount: None,
            currency: Currency::Try,
            check_in_date: None,
            check_out_date: None,
            guest_count: None,
            room_count: None,
            meeting_room: None,
            follow_up_date: NaiveDate::from_ymd_opt(2025, 9, 20).unwrap(),
            approved_at,
            created_at: Utc::now(),
        }
    }

    fn details_from(offer: Offer, company: &str, agent: &str) -> OfferWithDetails {
        OfferWithDetails {
            id: offer.id,
            hotel_id: offer.hotel_id,
            company_id: offer.company_id,
            agent_id: offer.agent_id,
            title: offer.title,
            status: offer.status,
            lost_reason: offer.lost_reason,
            price: offer.price,
            amount: offer.amount,
            currency: offer.currency,
            check_in_date: offer.check_in_date,
            check_out_date: offer.check_out_date,
            guest_count: offer.guest_count,
            room_count: offer.room_count,
            meeting_room: offer.meeting_room,
            follow_up_date: offer.follow_up_date,
            approved_at: offer.approved_at,
            created_at: offer.created_at,
            company_name: company.into(),
            agent_name: agent.into(),
        }
    }

    #[test]
    fn aprovar_pela_primeira_vez_carimba_a_data() {
        let offer = offer_with_status(OfferStatus::Waiting, None);
        let now = Utc::now();
        assert_eq!(next_approved_at(&offer, OfferStatus::Approved, now), Some(now));
    }

    #[test]
    fn reaprovar_nao_troca_o_carimbo() {
        let original = Utc::now() - chrono::Duration::days(10);
        let offer = offer_with_status(OfferStatus::Approved, Some(original));
        let now = Utc::now();
        assert_eq!(
            next_approved_at(&offer, OfferStatus::Approved, now),
            Some(original)
        );
    }

    #[test]
    fn sair_de_aprovado_preserva_o_carimbo() {
        let original = Utc::now() - chrono::Duration::days(3);
        let offer = offer_with_status(OfferStatus::Approved, Some(original));
        assert_eq!(
            next_approved_at(&offer, OfferStatus::Revised, Utc::now()),
            Some(original)
        );
    }

    #[test]
    fn transicao_entre_estados_nao_aprovados_mantem_nulo() {
        let offer = offer_with_status(OfferStatus::Sent, None);
        assert_eq!(next_approved_at(&offer, OfferStatus::Lost, Utc::now()), None);
    }

    #[test]
    fn csv_comeca_com_bom_e_cabecalho_sem_aspas() {
        let csv = offers_to_csv(&[]);
        assert!(csv.starts_with('\u{FEFF}'));
        let header = csv.trim_start_matches('\u{FEFF}');
        assert!(header.starts_with("ID,Firma,Tür,Durum"));
        assert_eq!(header.lines().count(), 1);
        assert_eq!(header.split(',').count(), 17);
    }

    #[test]
    fn csv_cita_todas_as_celulas_de_dados() {
        let mut offer = offer_with_status(OfferStatus::Sent, None);
        offer.price = Some("125.000 TL".into());
        offer.amount = Some(Decimal::new(125_000, 0));
        let csv = offers_to_csv(&[details_from(offer, "Acme Turizm", "Ayşe Yılmaz")]);

        let data_line = csv.lines().nth(1).unwrap();
        assert!(data_line.contains("\"Acme Turizm\""));
        assert!(data_line.contains("\"Konaklama\""));
        assert!(data_line.contains("\"sent\""));
        assert!(data_line.contains("\"125.000 TL\""));
        assert!(data_line.contains("\"TRY\""));
        // Campos vazios também vão entre aspas
        assert!(data_line.contains("\"\""));
    }

    #[test]
    fn csv_dobra_aspas_internas() {
        let mut offer = offer_with_status(OfferStatus::Lost, None);
        offer.lost_reason = Some("Cliente pediu \"desconto\"".into());
        let csv = offers_to_csv(&[details_from(offer, "Firma", "Agente")]);
        assert!(csv.contains("\"Cliente pediu \"\"desconto\"\"\""));
    }

    #[test]
    fn csv_uma_linha_por_oferta() {
        let offers = vec![
            details_from(offer_with_status(OfferStatus::Sent, None), "A", "X"),
            details_from(offer_with_status(OfferStatus::Lost, None), "B", "Y"),
        ];
        let csv = offers_to_csv(&offers);
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn nome_do_arquivo_usa_a_data_do_dia() {
        let today = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();
        assert_eq!(export_filename(today), "teklifler-2025-09-15.csv");
    }
}
