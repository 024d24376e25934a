use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Block type tag. Container kinds keep their children nested when the tree is
/// flattened; every other tag is carried verbatim in `Other` so unknown remote
/// types survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockKind {
    Callout,
    Toggle,
    Quote,
    ColumnList,
    Column,
    SyncedBlock,
    ChildPage,
    ChildDatabase,
    LinkToPage,
    Other(String),
}

impl BlockKind {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "callout" => Self::Callout,
            "toggle" => Self::Toggle,
            "quote" => Self::Quote,
            "column_list" => Self::ColumnList,
            "column" => Self::Column,
            "synced_block" => Self::SyncedBlock,
            "child_page" => Self::ChildPage,
            "child_database" => Self::ChildDatabase,
            "link_to_page" => Self::LinkToPage,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Callout => "callout",
            Self::Toggle => "toggle",
            Self::Quote => "quote",
            Self::ColumnList => "column_list",
            Self::Column => "column",
            Self::SyncedBlock => "synced_block",
            Self::ChildPage => "child_page",
            Self::ChildDatabase => "child_database",
            Self::LinkToPage => "link_to_page",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_container(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for BlockKind {
    fn from(value: String) -> Self {
        match Self::parse(&value) {
            Self::Other(_) => Self::Other(value),
            known => known,
        }
    }
}

impl From<BlockKind> for String {
    fn from(value: BlockKind) -> Self {
        match value {
            BlockKind::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default)]
    pub has_children: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Block>>,
    /// Everything else the remote object carries, including the payload keyed
    /// by the type tag (`"paragraph": {...}`).
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl Block {
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            kind,
            has_children: false,
            children: None,
            properties: Map::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.has_children = true;
        self.children = Some(children);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// The type-specific payload, e.g. the `paragraph` object of a paragraph.
    pub fn payload(&self) -> Option<&Value> {
        self.properties.get(self.kind.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockChildren {
    #[serde(default)]
    pub results: Vec<Block>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub plain_text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl RichText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageProperty {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Vec<RichText>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseQuery {
    #[serde(default)]
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Database object as returned by the retrieve endpoint. Only the parts the
/// structure view reads are typed.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSchema {
    pub id: String,
    #[serde(default)]
    pub title: Vec<RichText>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}
