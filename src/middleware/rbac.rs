// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{common::error::AppError, middleware::auth::AuthenticatedUser, models::auth::Role};

/// Capacidades protegidas por papel. A tabela abaixo é a única fonte
/// de verdade sobre quem pode o quê.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ManageUsers,
    ManageCampaigns,
    ViewAnalytics,
    ManageClients,
    ManageLeads,
    ManageTasks,
    ViewDashboard,
}

const ALL_ROLES: &[Role] = &[Role::Admin, Role::Marketing, Role::Commercial];

impl Capability {
    pub fn allowed_roles(self) -> &'static [Role] {
        match self {
            Capability::ManageUsers => &[Role::Admin],
            Capability::ManageCampaigns | Capability::ViewAnalytics => &[Role::Admin, Role::Marketing],
            Capability::ManageClients
            | Capability::ManageLeads
            | Capability::ManageTasks
            | Capability::ViewDashboard => ALL_ROLES,
        }
    }
}

/// Igualdade exata de papel: admin não herda nada que não esteja na tabela.
pub fn authorize(required: Capability, caller: Role) -> Result<(), AppError> {
    if required.allowed_roles().contains(&caller) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// 1. O Trait que liga um tipo marcador a uma capacidade
pub trait CapabilityDef: Send + Sync + 'static {
    fn capability() -> Capability;
}

/// 2. O Extractor (Guardião)
pub struct RequireCapability<C>(pub PhantomData<C>);

impl<C, S> FromRequestParts<S> for RequireCapability<C>
where
    C: CapabilityDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or(AppError::InvalidToken)?;

        if let Err(e) = authorize(C::capability(), user.0.role) {
            tracing::warn!(
                "Acesso negado: usuário {} ({:?}) sem {:?}",
                user.0.id,
                user.0.role,
                C::capability()
            );
            return Err(e);
        }

        Ok(RequireCapability(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS CAPACIDADES (TIPOS)
// ---

pub struct CanManageUsers;
impl CapabilityDef for CanManageUsers {
    fn capability() -> Capability { Capability::ManageUsers }
}

pub struct CanManageCampaigns;
impl CapabilityDef for CanManageCampaigns {
    fn capability() -> Capability { Capability::ManageCampaigns }
}

pub struct CanViewAnalytics;
impl CapabilityDef for CanViewAnalytics {
    fn capability() -> Capability { Capability::ViewAnalytics }
}

pub struct CanManageClients;
impl CapabilityDef for CanManageClients {
    fn capability() -> Capability { Capability::ManageClients }
}

pub struct CanManageLeads;
impl CapabilityDef for CanManageLeads {
    fn capability() -> Capability { Capability::ManageLeads }
}

pub struct CanManageTasks;
impl CapabilityDef for CanManageTasks {
    fn capability() -> Capability { Capability::ManageTasks }
}

pub struct CanViewDashboard;
impl CapabilityDef for CanViewDashboard {
    fn capability() -> Capability { Capability::ViewDashboard }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_only_for_user_management() {
        assert!(authorize(Capability::ManageUsers, Role::Admin).is_ok());
        assert!(matches!(authorize(Capability::ManageUsers, Role::Marketing), Err(AppError::Forbidden)));
        assert!(matches!(authorize(Capability::ManageUsers, Role::Commercial), Err(AppError::Forbidden)));
    }

    #[test]
    fn commercial_cannot_touch_campaigns_or_analytics() {
        assert!(authorize(Capability::ManageCampaigns, Role::Commercial).is_err());
        assert!(authorize(Capability::ViewAnalytics, Role::Commercial).is_err());
        assert!(authorize(Capability::ManageCampaigns, Role::Marketing).is_ok());
        assert!(authorize(Capability::ViewAnalytics, Role::Admin).is_ok());
    }

    #[test]
    fn shared_capabilities_allow_every_role() {
        for capability in [
            Capability::ManageClients,
            Capability::ManageLeads,
            Capability::ManageTasks,
            Capability::ViewDashboard,
        ] {
            for role in ALL_ROLES {
                assert!(authorize(capability, *role).is_ok(), "{capability:?} / {role:?}");
            }
        }
    }
}
