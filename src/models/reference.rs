// src/models/reference.rs

use serde::Serialize;
use uuid::Uuid;

/// Uma referência para outra entidade.
///
/// Sai do banco como `Id`. O passo de "populate" do serviço troca por
/// `Resolved` quando a entidade referenciada existe; referências órfãs
/// (usuário apagado, por exemplo) continuam como `Id`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Reference<T> {
    Id(Uuid),
    Resolved(T),
}

impl<T> Reference<T> {
    pub fn id(&self) -> Option<Uuid> {
        match self {
            Reference::Id(id) => Some(*id),
            Reference::Resolved(_) => None,
        }
    }
}

/// Troca a referência pelo objeto encontrado em `lookup`.
pub fn resolve<T: Clone>(
    reference: &mut Option<Reference<T>>,
    lookup: impl Fn(Uuid) -> Option<T>,
) {
    if let Some(Reference::Id(id)) = reference {
        if let Some(found) = lookup(*id) {
            *reference = Some(Reference::Resolved(found));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unresolved_reference_serializes_as_plain_id() {
        let id = Uuid::new_v4();
        let reference: Reference<String> = Reference::Id(id);
        assert_eq!(serde_json::to_value(&reference).unwrap(), json!(id.to_string()));
    }

    #[test]
    fn resolve_replaces_known_ids_only() {
        let known = Uuid::new_v4();
        let orphan = Uuid::new_v4();

        let mut a = Some(Reference::Id(known));
        let mut b = Some(Reference::Id(orphan));
        let mut c: Option<Reference<&str>> = None;

        let lookup = |id: Uuid| (id == known).then_some("Sami");
        resolve(&mut a, lookup);
        resolve(&mut b, lookup);
        resolve(&mut c, lookup);

        assert_eq!(a, Some(Reference::Resolved("Sami")));
        assert_eq!(b, Some(Reference::Id(orphan)));
        assert_eq!(c, None);
    }
}
