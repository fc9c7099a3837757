// src/common/scope.rs

use uuid::Uuid;

/// Escopo de visibilidade de uma consulta sobre entidades do tenant.
///
/// Regra aplicada uniformemente em list/get/update/delete:
/// - sem organização => conjunto vazio (fail-closed, nunca erro);
/// - com organização => filtra por ela;
/// - com escritório também => filtra adicionalmente por ele.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantScope {
    pub organization_id: Option<Uuid>,
    pub office_id: Option<Uuid>,
}

impl TenantScope {
    /// Escopo vazio: toda consulta escopada devolve zero linhas.
    pub fn empty() -> Self {
        Self {
            organization_id: None,
            office_id: None,
        }
    }

    pub fn new(organization_id: Option<Uuid>, office_id: Option<Uuid>) -> Self {
        // Escritório sem organização não faz sentido; degrada para vazio.
        match organization_id {
            Some(org) => Self {
                organization_id: Some(org),
                office_id,
            },
            None => Self::empty(),
        }
    }

    /// Indica se alguma linha pode ser visível sob este escopo.
    pub fn is_empty(&self) -> bool {
        self.organization_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escopo_sem_organizacao_e_vazio() {
        assert!(TenantScope::empty().is_empty());
        assert!(TenantScope::new(None, None).is_empty());
    }

    #[test]
    fn escritorio_sem_organizacao_degrada_para_vazio() {
        let office = Uuid::new_v4();
        let scope = TenantScope::new(None, Some(office));
        assert!(scope.is_empty());
        assert_eq!(scope.office_id, None);
    }
}
