use std::collections::BTreeMap;

use crate::database::models::Document;

/// Documents keyed by upload date ("YYYY-MM-DD")
pub type DateGroups = BTreeMap<String, Vec<Document>>;

/// Group documents by upload date. Input order is kept inside each group.
pub fn group_by_date(documents: &[Document]) -> DateGroups {
    let mut groups = DateGroups::new();
    for doc in documents {
        groups
            .entry(doc.upload_date().format("%Y-%m-%d").to_string())
            .or_default()
            .push(doc.clone());
    }
    groups
}

/// Group documents by owner display name, then by upload date
pub fn group_by_client(documents: &[Document]) -> BTreeMap<String, DateGroups> {
    let mut groups: BTreeMap<String, DateGroups> = BTreeMap::new();
    for doc in documents {
        groups
            .entry(doc.owner.display_name())
            .or_default()
            .entry(doc.upload_date().format("%Y-%m-%d").to_string())
            .or_default()
            .push(doc.clone());
    }
    groups
}
