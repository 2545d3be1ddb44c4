// src/services/populate.rs

// Passo explícito de "populate": troca ids de referência por resumos
// {id, name, email} / {id, name}, com uma consulta em lote por tabela.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CampaignRepository, UserRepository},
    models::{
        auth::UserSummary,
        campaign::CampaignSummary,
        lead::Lead,
        reference::{Reference, resolve},
        task::Task,
    },
};

/// Quais referências resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relations {
    pub assigned_to: bool,
    pub created_by: bool,
    pub campaign: bool,
}

impl Relations {
    pub const ALL: Self = Self { assigned_to: true, created_by: true, campaign: true };
    pub const USERS: Self = Self { assigned_to: true, created_by: true, campaign: false };
}

#[derive(Clone)]
pub struct Populator {
    user_repo: UserRepository,
    campaign_repo: CampaignRepository,
}

// Ids ainda não resolvidos, sem repetição
fn pending_ids<'a, T: 'a>(refs: impl Iterator<Item = &'a Option<Reference<T>>>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = refs.filter_map(|r| r.as_ref().and_then(Reference::id)).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

impl Populator {
    pub fn new(user_repo: UserRepository, campaign_repo: CampaignRepository) -> Self {
        Self { user_repo, campaign_repo }
    }

    async fn user_map(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, UserSummary>, AppError> {
        let users = self.user_repo.find_summaries(ids).await?;
        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }

    pub async fn leads(&self, leads: &mut [Lead], relations: Relations) -> Result<(), AppError> {
        if relations.assigned_to || relations.created_by {
            let refs = leads.iter().flat_map(|l| {
                [
                    relations.assigned_to.then_some(&l.assigned_to),
                    relations.created_by.then_some(&l.created_by),
                ]
                .into_iter()
                .flatten()
            });
            let users = self.user_map(&pending_ids(refs)).await?;
            let lookup = |id: Uuid| users.get(&id).cloned();

            for lead in leads.iter_mut() {
                if relations.assigned_to {
                    resolve(&mut lead.assigned_to, lookup);
                }
                if relations.created_by {
                    resolve(&mut lead.created_by, lookup);
                }
            }
        }

        if relations.campaign {
            let ids = pending_ids(leads.iter().map(|l| &l.campaign_id));
            let campaigns: HashMap<Uuid, CampaignSummary> = self
                .campaign_repo
                .find_summaries(&ids)
                .await?
                .into_iter()
                .map(|c| (c.id, c))
                .collect();

            for lead in leads.iter_mut() {
                resolve(&mut lead.campaign_id, |id| campaigns.get(&id).cloned());
            }
        }

        Ok(())
    }

    pub async fn tasks(&self, tasks: &mut [Task]) -> Result<(), AppError> {
        let refs = tasks.iter().flat_map(|t| [&t.assigned_to, &t.created_by]);
        let users = self.user_map(&pending_ids(refs)).await?;
        let lookup = |id: Uuid| users.get(&id).cloned();

        for task in tasks.iter_mut() {
            resolve(&mut task.assigned_to, lookup);
            resolve(&mut task.created_by, lookup);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_ids_are_unique_and_skip_resolved() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let refs: Vec<Option<Reference<UserSummary>>> = vec![
            Some(Reference::Id(a)),
            None,
            Some(Reference::Id(a)),
            Some(Reference::Resolved(UserSummary { id: b, name: "x".into(), email: "x@y.z".into() })),
            Some(Reference::Id(b)),
        ];

        let mut expected = vec![a, b];
        expected.sort_unstable();
        assert_eq!(pending_ids(refs.iter()), expected);
    }
}
