//! The video listing pipeline.
//!
//! Builds the filter + owner-join + sort + paginate aggregation described
//! by the API's `GET /videos` surface. The builder is pure so the stage
//! shapes can be asserted in tests without a running store.

use mongodb::bson::{doc, oid::ObjectId, Bson, Document};

use crate::sorting::SortConfig;

/// Page size bounds.
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MIN_PAGE_SIZE: u64 = 1;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Parameters for one listing request.
#[derive(Debug, Clone)]
pub struct VideoListQuery {
    /// 1-based page number.
    pub page: u64,
    /// Page size, clamped to the bounds above.
    pub limit: u64,
    /// Free text matched case-insensitively against title or description.
    pub query: String,
    pub sort: SortConfig,
    /// Restrict to a single owner when present.
    pub owner: Option<ObjectId>,
}

impl Default for VideoListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            query: String::new(),
            sort: SortConfig::default(),
            owner: None,
        }
    }
}

impl VideoListQuery {
    /// Build from raw request parameters, normalizing out-of-range values.
    pub fn from_params(
        page: Option<u64>,
        limit: Option<u64>,
        query: Option<String>,
        sort: SortConfig,
        owner: Option<ObjectId>,
    ) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
            query: query.unwrap_or_default(),
            sort,
            owner,
        }
    }

    /// Documents to skip for the requested page. Saturates instead of
    /// overflowing on absurd page numbers.
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Build the aggregation pipeline.
    ///
    /// Stages: `$match` (text OR filter plus optional owner equality),
    /// `$lookup`/`$addFields` (collapse the joined owner array to one
    /// optional public projection), `$sort`, and a `$facet` that pages the
    /// items while counting the full match set.
    pub fn build_pipeline(&self) -> Vec<Document> {
        let text_filter = doc! {
            "$regex": escape_regex(&self.query),
            "$options": "i",
        };

        let mut match_stage = doc! {
            "$or": [
                { "title": text_filter.clone() },
                { "description": text_filter },
            ],
        };
        if let Some(owner) = self.owner {
            match_stage.insert("owner", owner);
        }

        vec![
            doc! { "$match": match_stage },
            doc! {
                "$lookup": {
                    "from": "users",
                    "localField": "owner",
                    "foreignField": "_id",
                    "as": "owner",
                    "pipeline": [
                        { "$project": { "_id": 1, "fullName": 1, "username": 1, "avatar": 1 } },
                    ],
                }
            },
            // An empty join leaves `owner` unset rather than [].
            doc! { "$addFields": { "owner": { "$first": "$owner" } } },
            doc! { "$sort": self.sort.sort_document() },
            doc! {
                "$facet": {
                    "items": [
                        { "$skip": clamp_to_i64(self.skip()) },
                        { "$limit": clamp_to_i64(self.limit) },
                    ],
                    "total": [ { "$count": "count" } ],
                }
            },
        ]
    }
}

/// The store takes stage arguments as signed 64-bit integers.
fn clamp_to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Escape regex metacharacters so free text matches as a literal substring.
pub fn escape_regex(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(
            c,
            '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|' | '\\'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Read the match-set total out of the `$facet` result.
///
/// `$count` emits an integer whose width depends on the store; absent means
/// zero matches.
pub fn facet_total(total_entries: &[Document]) -> u64 {
    total_entries
        .first()
        .and_then(|d| d.get("count"))
        .map(|b| match b {
            Bson::Int32(n) => *n as u64,
            Bson::Int64(n) => *n as u64,
            Bson::Double(n) => *n as u64,
            _ => 0,
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sorting::{SortConfig, SortDirection};

    #[test]
    fn match_stage_filters_title_or_description() {
        let q = VideoListQuery {
            query: "intro".to_string(),
            ..Default::default()
        };
        let pipeline = q.build_pipeline();

        let m = pipeline[0].get_document("$match").unwrap();
        let or = m.get_array("$or").unwrap();
        assert_eq!(or.len(), 2);
        assert!(m.get("owner").is_none());

        let title = or[0].as_document().unwrap().get_document("title").unwrap();
        assert_eq!(title.get_str("$regex").unwrap(), "intro");
        assert_eq!(title.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn owner_filter_is_present_only_when_requested() {
        let owner = ObjectId::new();
        let q = VideoListQuery {
            owner: Some(owner),
            ..Default::default()
        };
        let m = q.build_pipeline()[0].get_document("$match").unwrap().clone();
        assert_eq!(m.get_object_id("owner").unwrap(), owner);
    }

    #[test]
    fn lookup_joins_users_with_public_projection() {
        let pipeline = VideoListQuery::default().build_pipeline();
        let lookup = pipeline[1].get_document("$lookup").unwrap();

        assert_eq!(lookup.get_str("from").unwrap(), "users");
        assert_eq!(lookup.get_str("localField").unwrap(), "owner");
        assert_eq!(lookup.get_str("foreignField").unwrap(), "_id");

        let project = lookup.get_array("pipeline").unwrap()[0]
            .as_document()
            .unwrap()
            .get_document("$project")
            .unwrap();
        for field in ["_id", "fullName", "username", "avatar"] {
            assert!(project.get(field).is_some(), "missing {field}");
        }
    }

    #[test]
    fn sort_stage_uses_requested_field_and_direction() {
        let q = VideoListQuery {
            sort: SortConfig {
                field: "duration".to_string(),
                direction: SortDirection::Descending,
            },
            ..Default::default()
        };
        let sort = q.build_pipeline()[3].get_document("$sort").unwrap().clone();
        assert_eq!(sort.get_i32("duration").unwrap(), -1);
    }

    #[test]
    fn facet_pages_and_counts() {
        let q = VideoListQuery::from_params(Some(3), Some(10), None, SortConfig::default(), None);
        assert_eq!(q.skip(), 20);

        let facet = q.build_pipeline()[4].get_document("$facet").unwrap().clone();
        let items = facet.get_array("items").unwrap();
        assert_eq!(
            items[0].as_document().unwrap().get_i64("$skip").unwrap(),
            20
        );
        assert_eq!(
            items[1].as_document().unwrap().get_i64("$limit").unwrap(),
            10
        );
        assert!(facet.get_array("total").is_ok());
    }

    #[test]
    fn params_are_normalized() {
        let q = VideoListQuery::from_params(Some(0), Some(0), None, SortConfig::default(), None);
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, MIN_PAGE_SIZE);

        let q = VideoListQuery::from_params(None, Some(10_000), None, SortConfig::default(), None);
        assert_eq!(q.limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn huge_page_number_saturates_instead_of_overflowing() {
        let q = VideoListQuery::from_params(
            Some(u64::MAX),
            Some(100),
            None,
            SortConfig::default(),
            None,
        );
        assert_eq!(q.skip(), u64::MAX);

        let facet = q.build_pipeline()[4].get_document("$facet").unwrap().clone();
        let items = facet.get_array("items").unwrap();
        assert_eq!(
            items[0].as_document().unwrap().get_i64("$skip").unwrap(),
            i64::MAX
        );
        assert_eq!(
            items[1].as_document().unwrap().get_i64("$limit").unwrap(),
            100
        );
    }

    #[test]
    fn free_text_matches_literally() {
        assert_eq!(escape_regex("c++ (draft)?"), "c\\+\\+ \\(draft\\)\\?");
        assert_eq!(escape_regex("plain words"), "plain words");
    }

    #[test]
    fn facet_total_reads_integer_widths() {
        assert_eq!(facet_total(&[doc! { "count": 7_i32 }]), 7);
        assert_eq!(facet_total(&[doc! { "count": 7_i64 }]), 7);
        assert_eq!(facet_total(&[]), 0);
    }
}
