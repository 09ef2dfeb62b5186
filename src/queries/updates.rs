//! Update operations
//!
//! Each update stages one new entity (or relationship) plus its edges in
//! the current transaction; the facade commits through the retry wrapper.
//! Referenced foreign vertices are checked in one batch up front, and a
//! missing referent aborts the operation without retrying.

use crate::error::{QueryError, QueryResult};
use crate::graph::{PropertyMap, PropertyValue, VertexId};
use crate::store::GraphStore;
use serde::{Deserialize, Serialize};

fn require_all(store: &dyn GraphStore, ids: &[VertexId]) -> QueryResult<()> {
    let missing = store.missing_vertices(ids)?;
    match missing.first() {
        Some(first) => Err(QueryError::MissingVertex(*first)),
        None => Ok(()),
    }
}

fn date_props(key: &str, value: i64) -> PropertyMap {
    let mut props = PropertyMap::new();
    props.insert(key.to_string(), PropertyValue::DateTime(value));
    props
}

// ---------------------------------------------------------------------------
// U1: add person

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganisationMembership {
    pub organisation_id: u64,
    pub year: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct U1Params {
    pub person_id: u64,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub birthday: i64,
    pub creation_date: i64,
    pub location_ip: String,
    pub browser_used: String,
    pub city_id: u64,
    pub languages: Vec<String>,
    pub emails: Vec<String>,
    pub tag_ids: Vec<u64>,
    pub universities: Vec<OrganisationMembership>,
    pub companies: Vec<OrganisationMembership>,
}

pub fn u1(store: &dyn GraphStore, params: &U1Params) -> QueryResult<()> {
    let person = VertexId::person(params.person_id);
    let city = VertexId::place(params.city_id);

    let mut referents = vec![city];
    referents.extend(params.tag_ids.iter().map(|id| VertexId::tag(*id)));
    referents.extend(
        params
            .universities
            .iter()
            .chain(&params.companies)
            .map(|m| VertexId::organisation(m.organisation_id)),
    );
    require_all(store, &referents)?;

    let mut props = PropertyMap::new();
    props.insert("firstName".to_string(), params.first_name.clone().into());
    props.insert("lastName".to_string(), params.last_name.clone().into());
    props.insert("gender".to_string(), params.gender.clone().into());
    props.insert("birthday".to_string(), PropertyValue::DateTime(params.birthday));
    props.insert("creationDate".to_string(), PropertyValue::DateTime(params.creation_date));
    props.insert("locationIP".to_string(), params.location_ip.clone().into());
    props.insert("browserUsed".to_string(), params.browser_used.clone().into());
    props.insert("language".to_string(), params.languages.clone().into());
    props.insert("email".to_string(), params.emails.clone().into());
    store.create_vertex(person, props)?;

    store.create_edge(person, "isLocatedIn", city, PropertyMap::new())?;
    for tag_id in &params.tag_ids {
        store.create_edge(person, "hasInterest", VertexId::tag(*tag_id), PropertyMap::new())?;
    }
    for membership in &params.universities {
        let mut edge = PropertyMap::new();
        edge.insert("classYear".to_string(), PropertyValue::Integer(membership.year));
        store.create_edge(
            person,
            "studyAt",
            VertexId::organisation(membership.organisation_id),
            edge,
        )?;
    }
    for membership in &params.companies {
        let mut edge = PropertyMap::new();
        edge.insert("workFrom".to_string(), PropertyValue::Integer(membership.year));
        store.create_edge(
            person,
            "workAt",
            VertexId::organisation(membership.organisation_id),
            edge,
        )?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// U2 / U3: likes

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct U2Params {
    pub person_id: u64,
    pub post_id: u64,
    pub creation_date: i64,
}

pub fn u2(store: &dyn GraphStore, params: &U2Params) -> QueryResult<()> {
    let person = VertexId::person(params.person_id);
    let post = VertexId::post(params.post_id);
    require_all(store, &[person, post])?;
    store.create_edge(person, "likes", post, date_props("creationDate", params.creation_date))?;
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct U3Params {
    pub person_id: u64,
    pub comment_id: u64,
    pub creation_date: i64,
}

pub fn u3(store: &dyn GraphStore, params: &U3Params) -> QueryResult<()> {
    let person = VertexId::person(params.person_id);
    let comment = VertexId::comment(params.comment_id);
    require_all(store, &[person, comment])?;
    store.create_edge(person, "likes", comment, date_props("creationDate", params.creation_date))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// U4: add forum

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct U4Params {
    pub forum_id: u64,
    pub title: String,
    pub creation_date: i64,
    pub moderator_id: u64,
    pub tag_ids: Vec<u64>,
}

pub fn u4(store: &dyn GraphStore, params: &U4Params) -> QueryResult<()> {
    let forum = VertexId::forum(params.forum_id);
    let moderator = VertexId::person(params.moderator_id);

    let mut referents = vec![moderator];
    referents.extend(params.tag_ids.iter().map(|id| VertexId::tag(*id)));
    require_all(store, &referents)?;

    let mut props = PropertyMap::new();
    props.insert("title".to_string(), params.title.clone().into());
    props.insert("creationDate".to_string(), PropertyValue::DateTime(params.creation_date));
    store.create_vertex(forum, props)?;

    store.create_edge(forum, "hasModerator", moderator, PropertyMap::new())?;
    for tag_id in &params.tag_ids {
        store.create_edge(forum, "hasTag", VertexId::tag(*tag_id), PropertyMap::new())?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// U5: add forum membership

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct U5Params {
    pub forum_id: u64,
    pub person_id: u64,
    pub join_date: i64,
}

pub fn u5(store: &dyn GraphStore, params: &U5Params) -> QueryResult<()> {
    let forum = VertexId::forum(params.forum_id);
    let person = VertexId::person(params.person_id);
    require_all(store, &[forum, person])?;
    store.create_edge(forum, "hasMember", person, date_props("joinDate", params.join_date))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// U6: add post

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct U6Params {
    pub post_id: u64,
    pub image_file: String,
    pub creation_date: i64,
    pub location_ip: String,
    pub browser_used: String,
    pub language: String,
    pub content: String,
    pub length: i64,
    pub author_id: u64,
    pub forum_id: u64,
    pub country_id: u64,
    pub tag_ids: Vec<u64>,
}

pub fn u6(store: &dyn GraphStore, params: &U6Params) -> QueryResult<()> {
    let post = VertexId::post(params.post_id);
    let author = VertexId::person(params.author_id);
    let forum = VertexId::forum(params.forum_id);
    let country = VertexId::place(params.country_id);

    let mut referents = vec![author, forum, country];
    referents.extend(params.tag_ids.iter().map(|id| VertexId::tag(*id)));
    require_all(store, &referents)?;

    let mut props = PropertyMap::new();
    props.insert("imageFile".to_string(), params.image_file.clone().into());
    props.insert("creationDate".to_string(), PropertyValue::DateTime(params.creation_date));
    props.insert("locationIP".to_string(), params.location_ip.clone().into());
    props.insert("browserUsed".to_string(), params.browser_used.clone().into());
    props.insert("language".to_string(), params.language.clone().into());
    props.insert("content".to_string(), params.content.clone().into());
    props.insert("length".to_string(), PropertyValue::Integer(params.length));
    store.create_vertex(post, props)?;

    store.create_edge(post, "hasCreator", author, PropertyMap::new())?;
    store.create_edge(forum, "containerOf", post, PropertyMap::new())?;
    store.create_edge(post, "isLocatedIn", country, PropertyMap::new())?;
    for tag_id in &params.tag_ids {
        store.create_edge(post, "hasTag", VertexId::tag(*tag_id), PropertyMap::new())?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// U7: add comment

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct U7Params {
    pub comment_id: u64,
    pub creation_date: i64,
    pub location_ip: String,
    pub browser_used: String,
    pub content: String,
    pub length: i64,
    pub author_id: u64,
    pub country_id: u64,
    /// Exactly one of the reply targets is set by the driver.
    pub reply_to_post_id: Option<u64>,
    pub reply_to_comment_id: Option<u64>,
    pub tag_ids: Vec<u64>,
}

pub fn u7(store: &dyn GraphStore, params: &U7Params) -> QueryResult<()> {
    let comment = VertexId::comment(params.comment_id);
    let author = VertexId::person(params.author_id);
    let country = VertexId::place(params.country_id);
    let parent = params
        .reply_to_post_id
        .map(VertexId::post)
        .or(params.reply_to_comment_id.map(VertexId::comment));

    let mut referents = vec![author, country];
    referents.extend(parent);
    referents.extend(params.tag_ids.iter().map(|id| VertexId::tag(*id)));
    require_all(store, &referents)?;

    let mut props = PropertyMap::new();
    props.insert("creationDate".to_string(), PropertyValue::DateTime(params.creation_date));
    props.insert("locationIP".to_string(), params.location_ip.clone().into());
    props.insert("browserUsed".to_string(), params.browser_used.clone().into());
    props.insert("content".to_string(), params.content.clone().into());
    props.insert("length".to_string(), PropertyValue::Integer(params.length));
    store.create_vertex(comment, props)?;

    store.create_edge(comment, "hasCreator", author, PropertyMap::new())?;
    store.create_edge(comment, "isLocatedIn", country, PropertyMap::new())?;
    if let Some(parent) = parent {
        store.create_edge(comment, "replyOf", parent, PropertyMap::new())?;
    }
    for tag_id in &params.tag_ids {
        store.create_edge(comment, "hasTag", VertexId::tag(*tag_id), PropertyMap::new())?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// U8: add friendship

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct U8Params {
    pub person1_id: u64,
    pub person2_id: u64,
    pub creation_date: i64,
}

/// Friendships are undirected: one `knows` edge is staged in each
/// direction, both carrying the same creation date.
pub fn u8(store: &dyn GraphStore, params: &U8Params) -> QueryResult<()> {
    let a = VertexId::person(params.person1_id);
    let b = VertexId::person(params.person2_id);
    require_all(store, &[a, b])?;
    store.create_edge(a, "knows", b, date_props("creationDate", params.creation_date))?;
    store.create_edge(b, "knows", a, date_props("creationDate", params.creation_date))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{GraphStore, MemoryStore};

    #[test]
    fn test_missing_referent_reported_before_staging() {
        let store = MemoryStore::new();
        store.seed_vertex(VertexId::person(1), PropertyMap::new());
        let err = u2(
            &store,
            &U2Params { person_id: 1, post_id: 99, creation_date: 0 },
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::MissingVertex(v) if v == VertexId::post(99)));
        assert_eq!(store.staged_write_count(), 0);
    }

    #[test]
    fn test_u7_prefers_post_parent() {
        let store = MemoryStore::new();
        store.seed_vertex(VertexId::person(1), PropertyMap::new());
        store.seed_vertex(VertexId::place(1), PropertyMap::new());
        store.seed_vertex(VertexId::post(5), PropertyMap::new());
        u7(
            &store,
            &U7Params {
                comment_id: 10,
                creation_date: 0,
                location_ip: String::new(),
                browser_used: String::new(),
                content: "reply".to_string(),
                length: 5,
                author_id: 1,
                country_id: 1,
                reply_to_post_id: Some(5),
                reply_to_comment_id: None,
                tag_ids: vec![],
            },
        )
        .unwrap();
        store.commit().unwrap();

        let parents = store
            .edges_of(
                VertexId::comment(10),
                "replyOf",
                crate::graph::Direction::Out,
                false,
                &[],
            )
            .unwrap();
        assert_eq!(parents.len(), 1);
        assert_eq!(parents[0].0, VertexId::post(5));
    }
}
