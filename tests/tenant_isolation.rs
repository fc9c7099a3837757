// tests/tenant_isolation.rs
//
// Testes de integração contra um Postgres real. Rodam com:
//   DATABASE_URL=... JWT_SECRET=... cargo test -- --ignored

use uuid::Uuid;

use jusoffice::{
    common::error::AppError,
    config::AppState,
    models::{
        audit::AuditAction,
        auth::User,
        customers::CustomerType,
        processes::ProcessArea,
        tenancy::{PlanTier, Role},
    },
    services::{
        audit::ClientInfo, customer_service::CustomerInput, process_service::ProcessInput,
        scoping::TenantContext,
    },
};

async fn setup() -> AppState {
    let state = AppState::new()
        .await
        .expect("AppState exige DATABASE_URL e JWT_SECRET");

    sqlx::migrate!()
        .run(&state.db_pool)
        .await
        .expect("migrações");

    state
}

async fn register(state: &AppState, name: &str) -> User {
    let email = format!("{}@example.com", Uuid::new_v4());
    let token = state
        .auth_service
        .register_user(&email, name, "segredo123")
        .await
        .expect("registro");

    state.auth_service.validate_token(&token).await.expect("token")
}

fn cpf_unico() -> String {
    // 11 dígitos pseudo-aleatórios a partir de um UUID
    let digits: String = Uuid::new_v4()
        .as_u128()
        .to_string()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(11)
        .collect();
    format!("{:0>11}", digits)
}

fn customer_input(name: &str, document: &str) -> CustomerInput {
    CustomerInput {
        name: name.to_string(),
        kind: CustomerType::Pf,
        document: document.to_string(),
        email: String::new(),
        phone: String::new(),
        phone_secondary: String::new(),
        address: String::new(),
        city: String::new(),
        state: String::new(),
        zip_code: String::new(),
        notes: String::new(),
    }
}

/// Cria organização + escritório para o usuário e devolve o contexto
/// resolvido e o id do escritório.
async fn org_with_office(state: &AppState, admin: &User, org_name: &str) -> (TenantContext, Uuid) {
    let client = ClientInfo::default();

    state
        .tenancy_service
        .create_organization_with_admin(admin, org_name, &cpf_unico(), PlanTier::Free, &client)
        .await
        .expect("organização");

    let ctx = state
        .scoping_service
        .resolve_context(admin.id)
        .await
        .expect("contexto");

    let office = state
        .tenancy_service
        .create_office(admin, &ctx, "Matriz", &client)
        .await
        .expect("escritório");

    (ctx, office.id)
}

#[tokio::test]
#[ignore]
async fn clientes_nao_vazam_entre_organizacoes() {
    let state = setup().await;
    let client = ClientInfo::default();

    let alice = register(&state, "Alice").await;
    let bruno = register(&state, "Bruno").await;

    let (ctx_a, office_a) = org_with_office(&state, &alice, "Escritório A").await;
    let (ctx_b, office_b) = org_with_office(&state, &bruno, "Escritório B").await;

    let customer_a = state
        .customer_service
        .create_customer(
            &alice,
            &ctx_a,
            Some(office_a),
            customer_input("Cliente de A", &cpf_unico()),
            &client,
        )
        .await
        .expect("cliente A");

    state
        .customer_service
        .create_customer(
            &bruno,
            &ctx_b,
            Some(office_b),
            customer_input("Cliente de B", &cpf_unico()),
            &client,
        )
        .await
        .expect("cliente B");

    // Cada organização enxerga apenas o próprio cliente
    let list_a = state
        .customer_service
        .list_customers(&ctx_a, None)
        .await
        .expect("lista A");
    assert_eq!(list_a.len(), 1);
    assert_eq!(list_a[0].name, "Cliente de A");

    let list_b = state
        .customer_service
        .list_customers(&ctx_b, None)
        .await
        .expect("lista B");
    assert_eq!(list_b.len(), 1);
    assert_eq!(list_b[0].name, "Cliente de B");

    // Buscar pelo id do outro tenant responde 404, não 403
    let err = state
        .customer_service
        .get_customer(&ctx_b, customer_a.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
#[ignore]
async fn usuario_sem_vinculo_ve_tudo_vazio() {
    let state = setup().await;

    let solto = register(&state, "Sem Vínculo").await;
    let ctx = state
        .scoping_service
        .resolve_context(solto.id)
        .await
        .expect("contexto");

    assert!(ctx.scope().is_empty());

    let customers = state
        .customer_service
        .list_customers(&ctx, None)
        .await
        .expect("lista");
    assert!(customers.is_empty());

    let processes = state
        .process_service
        .list_processes(&ctx)
        .await
        .expect("lista");
    assert!(processes.is_empty());
}

#[tokio::test]
#[ignore]
async fn documento_e_unico_por_organizacao_mas_nao_entre_elas() {
    let state = setup().await;
    let client = ClientInfo::default();

    let alice = register(&state, "Alice").await;
    let bruno = register(&state, "Bruno").await;

    let (ctx_a, office_a) = org_with_office(&state, &alice, "Org A").await;
    let (ctx_b, office_b) = org_with_office(&state, &bruno, "Org B").await;

    let doc = cpf_unico();

    state
        .customer_service
        .create_customer(
            &alice,
            &ctx_a,
            Some(office_a),
            customer_input("Primeiro", &doc),
            &client,
        )
        .await
        .expect("primeiro cadastro");

    // Mesmo documento na mesma organização: conflito
    let err = state
        .customer_service
        .create_customer(
            &alice,
            &ctx_a,
            Some(office_a),
            customer_input("Duplicado", &doc),
            &client,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UniqueConstraintViolation(_)));

    // Mesmo documento em OUTRA organização: permitido
    state
        .customer_service
        .create_customer(
            &bruno,
            &ctx_b,
            Some(office_b),
            customer_input("Homônimo", &doc),
            &client,
        )
        .await
        .expect("cadastro em outra organização");
}

#[tokio::test]
#[ignore]
async fn estagiario_le_mas_nao_escreve() {
    let state = setup().await;
    let client = ClientInfo::default();

    let admin = register(&state, "Admin").await;
    let estagiario = register(&state, "Estagiário").await;

    let (ctx_admin, office) = org_with_office(&state, &admin, "Org Estágio").await;

    state
        .tenancy_service
        .create_membership(&admin, &ctx_admin, estagiario.id, None, Role::Intern, &client)
        .await
        .expect("membership do estagiário");

    state
        .customer_service
        .create_customer(
            &admin,
            &ctx_admin,
            Some(office),
            customer_input("Cliente Visível", &cpf_unico()),
            &client,
        )
        .await
        .expect("cliente");

    let ctx_intern = state
        .scoping_service
        .resolve_context(estagiario.id)
        .await
        .expect("contexto do estagiário");

    // Escrita negada com 403
    let err = state
        .customer_service
        .create_customer(
            &estagiario,
            &ctx_intern,
            Some(office),
            customer_input("Tentativa", &cpf_unico()),
            &client,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    // Leitura permitida
    let list = state
        .customer_service
        .list_customers(&ctx_intern, None)
        .await
        .expect("lista");
    assert_eq!(list.len(), 1);
}

#[tokio::test]
#[ignore]
async fn processo_confidencial_e_mascarado_para_estagiario() {
    let state = setup().await;
    let client = ClientInfo::default();

    let admin = register(&state, "Admin").await;
    let estagiario = register(&state, "Estagiário").await;

    let (ctx_admin, office) = org_with_office(&state, &admin, "Org Sigilo").await;

    state
        .tenancy_service
        .create_membership(&admin, &ctx_admin, estagiario.id, None, Role::Intern, &client)
        .await
        .expect("membership");

    let numero = format!("{}", Uuid::new_v4());
    let process = state
        .process_service
        .create_process(
            &admin,
            &ctx_admin,
            Some(office),
            &numero,
            ProcessInput {
                internal_number: String::new(),
                area: ProcessArea::Criminal,
                subject: "Segredo de justiça".to_string(),
                court: String::new(),
                court_division: String::new(),
                value: None,
                distribution_date: None,
                notes: String::new(),
                is_confidential: true,
            },
            &client,
        )
        .await
        .expect("processo confidencial");

    let ctx_intern = state
        .scoping_service
        .resolve_context(estagiario.id)
        .await
        .expect("contexto");

    // Listagem omite o processo sigiloso
    let list = state
        .process_service
        .list_processes(&ctx_intern)
        .await
        .expect("lista");
    assert!(list.iter().all(|p| p.id != process.id));

    // Acesso direto responde 404, nunca 403
    let err = state
        .process_service
        .get_process(&ctx_intern, process.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    // O admin continua enxergando
    let visible = state
        .process_service
        .get_process(&ctx_admin, process.id)
        .await
        .expect("visível ao admin");
    assert_eq!(visible.id, process.id);
}

#[tokio::test]
#[ignore]
async fn criacao_de_cliente_gera_audit_log() {
    let state = setup().await;
    let client = ClientInfo::default();

    let admin = register(&state, "Admin").await;
    let (ctx, office) = org_with_office(&state, &admin, "Org Auditada").await;

    let customer = state
        .customer_service
        .create_customer(
            &admin,
            &ctx,
            Some(office),
            customer_input("Auditado", &cpf_unico()),
            &client,
        )
        .await
        .expect("cliente");

    let logs = state
        .audit_service
        .list_for_organization(admin.id, &ctx, 50, &state.db_pool)
        .await
        .expect("consulta do log");

    assert!(logs.iter().any(|log| {
        log.model_name == "Customer"
            && log.object_id == Some(customer.id)
            && log.action == AuditAction::Create
            && log.user_id == Some(admin.id)
    }));
}

#[tokio::test]
#[ignore]
async fn consulta_do_log_e_restrita_ao_org_admin() {
    let state = setup().await;
    let client = ClientInfo::default();

    let admin = register(&state, "Admin").await;
    let advogado = register(&state, "Advogado").await;

    let (ctx_admin, _office) = org_with_office(&state, &admin, "Org Restrita").await;

    state
        .tenancy_service
        .create_membership(&admin, &ctx_admin, advogado.id, None, Role::Lawyer, &client)
        .await
        .expect("membership");

    let ctx_lawyer = state
        .scoping_service
        .resolve_context(advogado.id)
        .await
        .expect("contexto");

    let err = state
        .audit_service
        .list_for_organization(advogado.id, &ctx_lawyer, 50, &state.db_pool)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
}
