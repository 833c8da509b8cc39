//! Relay-style connection types returned by list queries

use serde::{Deserialize, Serialize};

/// Cursor metadata for forward pagination
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub start_cursor: Option<String>,
    #[serde(default)]
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
    #[serde(default)]
    pub has_previous_page: bool,
}

impl PageInfo {
    /// Page info of the last page of a collection
    pub fn last(end_cursor: Option<&str>) -> Self {
        Self {
            end_cursor: end_cursor.map(str::to_string),
            ..Default::default()
        }
    }

    /// Page info of a page that has a successor
    pub fn more(end_cursor: &str) -> Self {
        Self {
            end_cursor: Some(end_cursor.to_string()),
            has_next_page: true,
            ..Default::default()
        }
    }
}

/// Wrapper around one record of a connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

/// One page of a paginated collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub page_info: PageInfo,
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

impl<T> Connection<T> {
    pub fn new(nodes: Vec<T>, page_info: PageInfo) -> Self {
        Self {
            page_info,
            edges: nodes.into_iter().map(|node| Edge { node }).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|edge| &edge.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Row {
        id: String,
    }

    #[test]
    fn test_connection_deserialization() {
        let json = r#"{
            "pageInfo": {
                "startCursor": "YXJyYXljb25uZWN0aW9uOjA=",
                "endCursor": "YXJyYXljb25uZWN0aW9uOjE0",
                "hasNextPage": true,
                "hasPreviousPage": false
            },
            "edges": [
                { "node": { "id": "RmluYW5jZUludm9pY2VOb2RlOjE=" } },
                { "node": { "id": "RmluYW5jZUludm9pY2VOb2RlOjI=" } }
            ]
        }"#;

        let page: Connection<Row> = serde_json::from_str(json).unwrap();
        assert_eq!(page.len(), 2);
        assert!(page.page_info.has_next_page);
        assert_eq!(page.page_info.end_cursor.as_deref(), Some("YXJyYXljb25uZWN0aW9uOjE0"));
        assert_eq!(page.nodes().next().unwrap().id, "RmluYW5jZUludm9pY2VOb2RlOjE=");
    }

    #[test]
    fn test_connection_with_minimal_page_info() {
        let json = r#"{ "pageInfo": { "endCursor": null, "hasNextPage": false } }"#;
        let page: Connection<Row> = serde_json::from_str(json).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.page_info, PageInfo::last(None));
    }
}
