// src/lib.rs

pub mod common;
pub mod config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
};

use crate::config::AppState;
use crate::middleware::{auth::auth_guard, tenancy::tenant_guard};

/// Monta o router completo da API sobre um `AppState` já construído.
pub fn build_router(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas de usuário (exigem apenas token)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Criar/listar organizações só precisa de token; mexer nas configurações
    // depende do contexto de tenant resolvido pelo tenant_guard
    let organization_routes = Router::new()
        .route(
            "/",
            post(handlers::tenancy::create_organization)
                .get(handlers::tenancy::list_my_organizations),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ))
        .merge(
            Router::new()
                .route(
                    "/settings",
                    patch(handlers::tenancy::update_organization_settings),
                )
                .layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    tenant_guard,
                )),
        );

    let office_routes = Router::new()
        .route(
            "/",
            post(handlers::tenancy::create_office).get(handlers::tenancy::list_offices),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let membership_routes = Router::new()
        .route(
            "/",
            post(handlers::tenancy::create_membership).get(handlers::tenancy::list_memberships),
        )
        .route(
            "/{id}/active",
            patch(handlers::tenancy::set_membership_active),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let customer_routes = Router::new()
        .route(
            "/",
            post(handlers::customers::create_customer).get(handlers::customers::list_customers),
        )
        .route(
            "/{id}",
            get(handlers::customers::get_customer)
                .put(handlers::customers::update_customer)
                .delete(handlers::customers::delete_customer),
        )
        .route(
            "/{id}/active",
            patch(handlers::customers::set_customer_active),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let process_routes = Router::new()
        .route(
            "/",
            post(handlers::processes::create_process).get(handlers::processes::list_processes),
        )
        .route(
            "/{id}",
            get(handlers::processes::get_process)
                .put(handlers::processes::update_process)
                .delete(handlers::processes::delete_process),
        )
        .route(
            "/{id}/parties",
            post(handlers::processes::add_party).get(handlers::processes::list_parties),
        )
        .route(
            "/{id}/parties/{party_id}",
            delete(handlers::processes::remove_party),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let deadline_routes = Router::new()
        .route(
            "/",
            post(handlers::deadlines::create_deadline).get(handlers::deadlines::list_deadlines),
        )
        .route(
            "/{id}",
            get(handlers::deadlines::get_deadline)
                .put(handlers::deadlines::update_deadline)
                .delete(handlers::deadlines::delete_deadline),
        )
        .route("/{id}/complete", post(handlers::deadlines::complete_deadline))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let document_routes = Router::new()
        .route(
            "/",
            post(handlers::documents::create_document).get(handlers::documents::list_documents),
        )
        .route(
            "/{id}",
            get(handlers::documents::get_document)
                .put(handlers::documents::update_document)
                .delete(handlers::documents::delete_document),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let finance_routes = Router::new()
        .route(
            "/agreements",
            post(handlers::finance::create_agreement).get(handlers::finance::list_agreements),
        )
        .route(
            "/agreements/{id}",
            get(handlers::finance::get_agreement).delete(handlers::finance::delete_agreement),
        )
        .route(
            "/agreements/{id}/status",
            patch(handlers::finance::set_agreement_status),
        )
        .route(
            "/payments",
            post(handlers::finance::create_payment).get(handlers::finance::list_payments),
        )
        .route("/payments/{id}", get(handlers::finance::get_payment))
        .route("/payments/{id}/receive", post(handlers::finance::receive_payment))
        .route(
            "/payments/{id}/status",
            patch(handlers::finance::set_payment_status),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let audit_routes = Router::new()
        .route("/", get(handlers::audit::list_audit_logs))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/organizations", organization_routes)
        .nest("/api/offices", office_routes)
        .nest("/api/memberships", membership_routes)
        .nest("/api/customers", customer_routes)
        .nest("/api/processes", process_routes)
        .nest("/api/deadlines", deadline_routes)
        .nest("/api/documents", document_routes)
        .nest("/api/finance", finance_routes)
        .nest("/api/audit-logs", audit_routes)
        .with_state(app_state)
}
