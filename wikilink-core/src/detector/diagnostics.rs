//! Operator-facing diagnostics.
//!
//! These write to the `log` channel under the `wikilink::diagnostics` target
//! and never influence a verdict.

use log::{info, warn};

use super::WikimediaLinkIssueDetector;
use crate::{
    KnowledgeBase, LookupError, WikidataId, classify::has_known_safe_type,
    countries::CountryLanguages,
};

const TARGET: &str = "wikilink::diagnostics";

impl<K, C> WikimediaLinkIssueDetector<K, C>
where
    K: KnowledgeBase,
    C: CountryLanguages,
{
    /// Log a warning when none of the entity's types is a known safe type.
    ///
    /// `context` is echoed in the message to say where the entity came from.
    pub fn complain_if_wikidata_entry_not_of_known_safe_type(
        &self,
        wikidata_id: &str,
        context: &str,
    ) {
        let Ok(id) = WikidataId::parse(wikidata_id) else {
            warn!(target: TARGET, "{context}: {wikidata_id:?} is not a wikidata identifier");
            return;
        };
        match self.is_of_known_safe_type(&id) {
            Ok(true) => {}
            Ok(false) => warn!(target: TARGET, "{context}: {id} is not of a known safe type"),
            Err(err) => warn!(target: TARGET, "{context}: could not check types of {id}: {err}"),
        }
    }

    pub(super) fn is_of_known_safe_type(&self, id: &WikidataId) -> Result<bool, LookupError> {
        self.knowledge_base
            .resolve_type_ancestry(id)
            .map(|ancestry| has_known_safe_type(&ancestry))
    }

    /// Log every resolved ancestor type of the entity.
    pub fn dump_base_types_of_object(&self, wikidata_id: &str, context: &str) {
        let Ok(id) = WikidataId::parse(wikidata_id) else {
            warn!(target: TARGET, "{context}: {wikidata_id:?} is not a wikidata identifier");
            return;
        };
        match self.knowledge_base.resolve_type_ancestry(&id) {
            Ok(ancestry) => {
                let types: Vec<&str> = ancestry.iter().map(WikidataId::as_str).collect();
                info!(target: TARGET, "{context}: base types of {id}: [{}]", types.join(", "));
            }
            Err(err) => warn!(target: TARGET, "{context}: could not dump types of {id}: {err}"),
        }
    }
}
