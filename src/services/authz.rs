// src/services/authz.rs

use uuid::Uuid;

use crate::{common::error::AppError, db::MembershipRepository, models::tenancy::Role};

/// Capacidades do sistema. A tabela declarativa capability -> papéis
/// substitui as antigas classes de permissão ad hoc: uma única função
/// genérica avalia todas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    AdministerOrganization,
    AdministerOffice,
    ManageCustomers,
    ManageProcesses,
    ViewConfidential,
    /// Leitura é irrestrita entre membros: qualquer membership ativo serve.
    ReadRecords,
}

impl Capability {
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Capability::AdministerOrganization => &[Role::OrgAdmin],
            Capability::AdministerOffice => &[Role::OrgAdmin, Role::OfficeAdmin],
            Capability::ManageCustomers | Capability::ManageProcesses => {
                &[Role::OrgAdmin, Role::OfficeAdmin, Role::Lawyer]
            }
            Capability::ViewConfidential => &[Role::OrgAdmin, Role::OfficeAdmin, Role::Lawyer],
            Capability::ReadRecords => &Role::ALL,
        }
    }
}

/// Regra de visibilidade por objeto: recurso não-confidencial é visível a
/// qualquer membro; confidencial, só aos papéis de ViewConfidential.
pub fn role_can_view_object(role: Role, is_confidential: bool) -> bool {
    if !is_confidential {
        return true;
    }
    Capability::ViewConfidential.allowed_roles().contains(&role)
}

/// Authorization Evaluator: consulta o registro de memberships para decidir
/// se o usuário possui, na organização, algum papel do conjunto permitido.
/// Ausência de membership => negação.
#[derive(Clone)]
pub struct AuthorizationService {
    membership_repo: MembershipRepository,
}

impl AuthorizationService {
    pub fn new(membership_repo: MembershipRepository) -> Self {
        Self { membership_repo }
    }

    pub async fn authorize(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        capability: Capability,
    ) -> Result<bool, AppError> {
        self.membership_repo
            .has_active_role(user_id, organization_id, capability.allowed_roles())
            .await
    }

    /// Igual a `authorize`, mas converte a negação em `AppError::Forbidden`
    /// (403, distinto de NotFound).
    pub async fn ensure(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        capability: Capability,
    ) -> Result<(), AppError> {
        if self.authorize(user_id, organization_id, capability).await? {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabela_de_capacidades() {
        // Administração da organização é exclusiva do org_admin
        assert_eq!(
            Capability::AdministerOrganization.allowed_roles(),
            &[Role::OrgAdmin]
        );

        // Estagiário lê, mas não escreve
        let write = Capability::ManageCustomers.allowed_roles();
        assert!(!write.contains(&Role::Intern));
        assert!(Capability::ReadRecords.allowed_roles().contains(&Role::Intern));

        // Advogado escreve clientes e processos
        assert!(write.contains(&Role::Lawyer));
        assert!(Capability::ManageProcesses.allowed_roles().contains(&Role::Lawyer));

        // Financeiro/contador não administram escritórios
        let office_admin = Capability::AdministerOffice.allowed_roles();
        assert!(!office_admin.contains(&Role::Finance));
        assert!(!office_admin.contains(&Role::Accountant));
        assert!(office_admin.contains(&Role::OfficeAdmin));
    }

    #[test]
    fn visibilidade_de_objeto_confidencial() {
        // Não-confidencial: qualquer papel enxerga
        for role in Role::ALL {
            assert!(role_can_view_object(role, false));
        }

        // Confidencial: apenas admins e advogados
        assert!(role_can_view_object(Role::OrgAdmin, true));
        assert!(role_can_view_object(Role::OfficeAdmin, true));
        assert!(role_can_view_object(Role::Lawyer, true));
        assert!(!role_can_view_object(Role::Intern, true));
        assert!(!role_can_view_object(Role::Guest, true));
        assert!(!role_can_view_object(Role::Accountant, true));
        assert!(!role_can_view_object(Role::Finance, true));
    }
}
