// src/common/read_degrade.rs

use crate::common::error::AppError;

// Política de leitura das listagens: falha de INFRA vira coleção vazia
// com 200, registrada no log. Erros deliberados (404 de tenant, 403 de
// papel) seguem o caminho normal. Toda listagem que degrada passa por
// aqui, nunca por um catch esquecido.
pub fn or_empty<T>(result: Result<Vec<T>, AppError>, what: &str) -> Result<Vec<T>, AppError> {
    match result {
        Err(AppError::DatabaseError(e)) => {
            tracing::error!("Listagem de {} falhou, devolvendo vazia: {}", what, e);
            Ok(Vec::new())
        }
        Err(AppError::InternalServerError(e)) => {
            tracing::error!("Listagem de {} falhou, devolvendo vazia: {}", what, e);
            Ok(Vec::new())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sucesso_passa_direto() {
        let result = or_empty(Ok(vec![1, 2, 3]), "numeros");
        assert_eq!(result.unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn falha_de_banco_vira_lista_vazia() {
        let failing: Result<Vec<i32>, AppError> =
            Err(AppError::DatabaseError(sqlx::Error::PoolTimedOut));
        let result = or_empty(failing, "numeros");
        assert_eq!(result.unwrap(), Vec::<i32>::new());
    }

    #[test]
    fn erro_deliberado_nao_degrada() {
        let not_found: Result<Vec<i32>, AppError> = Err(AppError::NotFound("Teklif bulunamadı."));
        assert!(matches!(
            or_empty(not_found, "notas"),
            Err(AppError::NotFound(_))
        ));
    }
}
