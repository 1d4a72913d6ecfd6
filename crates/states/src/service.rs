//! Fun-fact merge and mutation service
//!
//! Shared by the HTTP handlers and the CLI. Every per-state call resolves the
//! code against the catalog before touching the store.

use futures::future::join_all;
use states_core::funfacts::{check_fact, FUNFACTS_REQUIRED, INDEX_REQUIRED};
use states_core::projections::{self, AdmissionView, CapitalView, NicknameView, PopulationView};
use states_core::{
    merge_state, pick_random_fun_fact, Catalog, Contiguity, FunFactEntry, FunFactMutation,
    MergedStateView, RandomFunFact, StateRecord,
};

use crate::error::Error;
use crate::store::FunFactStore;

pub type ServiceResult<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct StatesService {
    catalog: &'static Catalog,
    store: FunFactStore,
}

impl StatesService {
    pub fn new(store: FunFactStore) -> Self {
        Self::with_catalog(Catalog::builtin(), store)
    }

    pub fn with_catalog(catalog: &'static Catalog, store: FunFactStore) -> Self {
        Self { catalog, store }
    }

    pub fn resolve(&self, code: &str) -> ServiceResult<&'static StateRecord> {
        Ok(self.catalog.resolve(code)?)
    }

    /// Merged views for the whole catalog or a contiguity subset.
    ///
    /// Store lookups run concurrently; output keeps catalog order.
    pub async fn merged_list(
        &self,
        contiguity: Option<Contiguity>,
    ) -> ServiceResult<Vec<MergedStateView>> {
        let lookups = self
            .catalog
            .select(contiguity)
            .into_iter()
            .map(|record| async move {
                let entry = self.store.find(&record.code).await?;
                Ok::<_, Error>(merge_state(record, entry))
            });

        join_all(lookups).await.into_iter().collect()
    }

    pub async fn merged_single(&self, code: &str) -> ServiceResult<MergedStateView> {
        let record = self.resolve(code)?;
        let entry = self.store.find(&record.code).await?;
        Ok(merge_state(record, entry))
    }

    pub async fn random_fun_fact(&self, code: &str) -> ServiceResult<RandomFunFact> {
        let record = self.resolve(code)?;
        let entry = self.store.find(&record.code).await?;
        Ok(pick_random_fun_fact(
            record,
            entry.as_ref(),
            &mut rand::thread_rng(),
        ))
    }

    pub fn capital(&self, code: &str) -> ServiceResult<CapitalView> {
        self.resolve(code).map(projections::capital)
    }

    pub fn nickname(&self, code: &str) -> ServiceResult<NicknameView> {
        self.resolve(code).map(projections::nickname)
    }

    pub fn population(&self, code: &str) -> ServiceResult<PopulationView> {
        self.resolve(code).map(projections::population)
    }

    pub fn admission(&self, code: &str) -> ServiceResult<AdmissionView> {
        self.resolve(code).map(projections::admission)
    }

    pub async fn create_fun_facts(
        &self,
        code: &str,
        facts: Vec<String>,
    ) -> ServiceResult<FunFactEntry> {
        let record = self.resolve(code)?;
        if facts.is_empty() {
            return Err(states_core::Error::validation(FUNFACTS_REQUIRED).into());
        }
        facts.iter().try_for_each(|fact| check_fact(fact))?;
        self.mutate(record, FunFactMutation::Append(facts)).await
    }

    pub async fn replace_fun_fact(
        &self,
        code: &str,
        index: usize,
        fact: String,
    ) -> ServiceResult<FunFactEntry> {
        let record = self.resolve(code)?;
        if index == 0 {
            return Err(states_core::Error::validation(INDEX_REQUIRED).into());
        }
        check_fact(&fact)?;
        self.mutate(record, FunFactMutation::Replace { index, fact })
            .await
    }

    pub async fn delete_fun_fact(&self, code: &str, index: usize) -> ServiceResult<FunFactEntry> {
        let record = self.resolve(code)?;
        if index == 0 {
            return Err(states_core::Error::validation(INDEX_REQUIRED).into());
        }
        self.mutate(record, FunFactMutation::Remove { index }).await
    }

    /// Apply an already validated mutation for a resolved state.
    pub async fn mutate(
        &self,
        record: &StateRecord,
        mutation: FunFactMutation,
    ) -> ServiceResult<FunFactEntry> {
        let kind = match &mutation {
            FunFactMutation::Append(facts) => format!("append {}", facts.len()),
            FunFactMutation::Replace { index, .. } => format!("replace #{index}"),
            FunFactMutation::Remove { index } => format!("remove #{index}"),
        };

        let entry = self.store.apply(record, mutation).await?;
        log::info!(
            "{}: {kind}, {} fun facts stored",
            record.code,
            entry.funfacts.len()
        );
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> StatesService {
        StatesService::new(FunFactStore::open_in_memory().unwrap())
    }

    fn facts(items: &[&str]) -> Vec<String> {
        items.iter().map(|f| f.to_string()).collect()
    }

    #[tokio::test]
    async fn test_create_then_get_single() {
        let service = service();
        service
            .create_fun_facts("CA", facts(&["fact1"]))
            .await
            .unwrap();

        let merged = service.merged_single("ca").await.unwrap();
        assert_eq!(merged.funfacts, Some(facts(&["fact1"])));
    }

    #[tokio::test]
    async fn test_create_twice_appends() {
        let service = service();
        service.create_fun_facts("CA", facts(&["fact1"])).await.unwrap();
        service.create_fun_facts("CA", facts(&["fact2"])).await.unwrap();

        let merged = service.merged_single("CA").await.unwrap();
        assert_eq!(merged.funfacts, Some(facts(&["fact1", "fact2"])));
    }

    #[tokio::test]
    async fn test_replace_and_out_of_range() {
        let service = service();
        service
            .create_fun_facts("CA", facts(&["fact1", "fact2"]))
            .await
            .unwrap();

        let entry = service
            .replace_fun_fact("CA", 1, "newfact".into())
            .await
            .unwrap();
        assert_eq!(entry.funfacts, facts(&["newfact", "fact2"]));

        let err = service
            .replace_fun_fact("CA", 5, "x".into())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Rejected(states_core::Error::IndexOutOfRange { .. })
        ));

        let merged = service.merged_single("CA").await.unwrap();
        assert_eq!(merged.funfacts, Some(facts(&["newfact", "fact2"])));
    }

    #[tokio::test]
    async fn test_delete_to_empty_keeps_entry() {
        let service = service();
        service.create_fun_facts("CA", facts(&["a", "b"])).await.unwrap();

        let entry = service.delete_fun_fact("CA", 1).await.unwrap();
        assert_eq!(entry.funfacts, facts(&["b"]));

        let entry = service.delete_fun_fact("CA", 1).await.unwrap();
        assert!(entry.funfacts.is_empty());

        // The document remains but the merged view drops the empty list.
        assert_eq!(service.store.count().await.unwrap(), 1);
        assert_eq!(service.merged_single("CA").await.unwrap().funfacts, None);
    }

    #[tokio::test]
    async fn test_random_fun_fact() {
        let service = service();
        assert_eq!(
            service.random_fun_fact("OH").await.unwrap(),
            RandomFunFact::Message {
                message: "No Fun Facts found for Ohio".into()
            }
        );

        service.create_fun_facts("OH", facts(&["x", "y"])).await.unwrap();
        match service.random_fun_fact("OH").await.unwrap() {
            RandomFunFact::Fact { funfact } => assert!(funfact == "x" || funfact == "y"),
            other => panic!("expected a fact, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_merged_list_keeps_catalog_order() {
        let service = service();
        service.create_fun_facts("WY", facts(&["wind"])).await.unwrap();

        let all = service.merged_list(None).await.unwrap();
        assert_eq!(all.len(), 50);
        assert_eq!(all[0].record.code, "AL");
        assert_eq!(all[49].record.code, "WY");
        assert_eq!(all[49].funfacts, Some(facts(&["wind"])));
        assert!(all[..49].iter().all(|view| view.funfacts.is_none()));

        let non_contiguous = service
            .merged_list(Some(Contiguity::NonContiguous))
            .await
            .unwrap();
        let codes: Vec<&str> = non_contiguous
            .iter()
            .map(|view| view.record.code.as_str())
            .collect();
        assert_eq!(codes, vec!["AK", "HI"]);
    }

    #[tokio::test]
    async fn test_invalid_code_everywhere() {
        let service = service();
        let is_invalid =
            |err: Error| matches!(err, Error::Rejected(states_core::Error::InvalidStateCode));

        assert!(is_invalid(service.merged_single("ZZ").await.unwrap_err()));
        assert!(is_invalid(service.random_fun_fact("ZZ").await.unwrap_err()));
        assert!(is_invalid(service.capital("ZZ").unwrap_err()));
        assert!(is_invalid(service.nickname("ZZ").unwrap_err()));
        assert!(is_invalid(service.population("ZZ").unwrap_err()));
        assert!(is_invalid(service.admission("ZZ").unwrap_err()));
        assert!(is_invalid(
            service
                .create_fun_facts("ZZ", facts(&["a"]))
                .await
                .unwrap_err()
        ));
        assert!(is_invalid(
            service.delete_fun_fact("ZZ", 1).await.unwrap_err()
        ));
        assert_eq!(service.store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_requires_facts() {
        let service = service();
        let err = service.create_fun_facts("CA", vec![]).await.unwrap_err();
        assert_eq!(err.to_string(), FUNFACTS_REQUIRED);
    }

    #[tokio::test]
    async fn test_blank_facts_rejected_on_create_and_replace() {
        let service = service();
        let err = service
            .create_fun_facts("CA", facts(&["ok", " "]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), states_core::funfacts::FUNFACT_BLANK);
        assert_eq!(service.store.count().await.unwrap(), 0);

        service.create_fun_facts("CA", facts(&["ok"])).await.unwrap();
        let err = service
            .replace_fun_fact("CA", 1, "\t ".into())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), states_core::funfacts::FUNFACT_BLANK);
        assert_eq!(
            service.merged_single("CA").await.unwrap().funfacts,
            Some(facts(&["ok"]))
        );
    }
}
