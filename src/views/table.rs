use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    models::{Interaction, InteractionType, Item, User},
    views::Tone,
};

/// Shown in place of rows when the page window is empty
pub const DEFAULT_EMPTY_MESSAGE: &str = "No data available";

const TIMESTAMP_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub key: &'static str,
    pub header: &'static str,
}

impl Column {
    pub const fn new(key: &'static str, header: &'static str) -> Self {
        Self { key, header }
    }
}

/// One rendered table cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Cell {
    Text(String),
    Badge { label: String, tone: Tone },
    Badges(Vec<String>),
    Rating(f64),
    Money(String),
    Timestamp(String),
    Empty,
}

impl Cell {
    pub fn text(text: impl ToString) -> Self {
        Cell::Text(text.to_string())
    }

    pub fn badge(label: impl Into<String>, tone: Tone) -> Self {
        Cell::Badge {
            label: label.into(),
            tone,
        }
    }

    /// Dollar amount with two decimals
    pub fn money(amount: f64) -> Self {
        Cell::Money(format!("${:.2}", amount))
    }

    /// Absent or zero ratings render as an empty cell
    pub fn optional_rating(rating: Option<f64>) -> Self {
        match rating {
            Some(rating) if rating != 0.0 => Cell::Rating(rating),
            _ => Cell::Empty,
        }
    }

    pub fn timestamp(timestamp: Option<DateTime<Utc>>) -> Self {
        Cell::Timestamp(format_timestamp(timestamp))
    }
}

/// Display form of a stored timestamp, "N/A" when absent
pub fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(at) => at.format(TIMESTAMP_FORMAT).to_string(),
        None => "N/A".to_string(),
    }
}

/// A record that renders as one table row
pub trait TableRow {
    const COLUMNS: &'static [Column];

    fn cells(&self) -> Vec<Cell>;
}

impl TableRow for User {
    const COLUMNS: &'static [Column] = &[
        Column::new("id", "ID"),
        Column::new("name", "Name"),
        Column::new("email", "Email"),
        Column::new("age", "Age"),
        Column::new("preferences", "Preferences"),
        Column::new("totalInteractions", "Interactions"),
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.id),
            Cell::text(&self.name),
            Cell::text(&self.email),
            Cell::text(self.age),
            Cell::Badges(self.preferences.clone()),
            Cell::text(self.total_interactions),
        ]
    }
}

impl TableRow for Item {
    const COLUMNS: &'static [Column] = &[
        Column::new("id", "ID"),
        Column::new("title", "Title"),
        Column::new("category", "Category"),
        Column::new("tags", "Tags"),
        Column::new("price", "Price"),
        Column::new("rating", "Rating"),
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.id),
            Cell::text(&self.title),
            Cell::text(&self.category),
            Cell::Badges(self.tags.clone()),
            Cell::money(self.price),
            Cell::Rating(self.rating),
        ]
    }
}

pub fn interaction_tone(kind: InteractionType) -> Tone {
    match kind {
        InteractionType::View => Tone::Neutral,
        InteractionType::Click => Tone::Info,
        InteractionType::Purchase => Tone::Success,
        InteractionType::Rating => Tone::Warning,
    }
}

impl TableRow for Interaction {
    const COLUMNS: &'static [Column] = &[
        Column::new("id", "ID"),
        Column::new("userId", "User ID"),
        Column::new("itemId", "Item ID"),
        Column::new("type", "Type"),
        Column::new("rating", "Rating"),
        Column::new("timestamp", "Timestamp"),
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.id),
            Cell::text(&self.user_id),
            Cell::text(&self.item_id),
            Cell::badge(self.kind.as_str(), interaction_tone(self.kind)),
            Cell::optional_rating(self.rating),
            Cell::timestamp(self.timestamp),
        ]
    }
}

/// A table of one page window
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
    /// Set only when there are no rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

impl Table {
    pub fn new<T: TableRow>(records: &[T], empty_message: &str) -> Self {
        let rows: Vec<Vec<Cell>> = records.iter().map(T::cells).collect();
        let empty_message = rows.is_empty().then(|| empty_message.to_string());

        Self {
            title: None,
            columns: T::COLUMNS.to_vec(),
            rows,
            empty_message,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn item(id: &str, price: f64) -> Item {
        Item {
            id: id.to_string(),
            title: "Lamp".to_string(),
            category: "Home".to_string(),
            tags: vec!["light".to_string()],
            price,
            rating: 4.5,
            rating_count: None,
            description: String::new(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_item_row() {
        let table = Table::new(&[item("i1", 30.0)], DEFAULT_EMPTY_MESSAGE);
        let headers: Vec<&str> = table.columns.iter().map(|c| c.header).collect();
        assert_eq!(headers, vec!["ID", "Title", "Category", "Tags", "Price", "Rating"]);
        assert_eq!(table.rows[0][4], Cell::Money("$30.00".to_string()));
        assert!(table.empty_message.is_none());
    }

    #[test]
    fn test_empty_table_carries_message() {
        let table = Table::new::<Item>(&[], DEFAULT_EMPTY_MESSAGE);
        assert!(table.rows.is_empty());
        assert_eq!(table.empty_message.as_deref(), Some("No data available"));
        assert_eq!(table.columns.len(), 6);
    }

    #[test]
    fn test_interaction_row() {
        let interaction = Interaction {
            id: "x1".to_string(),
            user_id: "u1".to_string(),
            item_id: "i1".to_string(),
            kind: InteractionType::Purchase,
            rating: None,
            timestamp: Some(Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap()),
            duration: None,
            metadata: None,
        };

        let cells = interaction.cells();
        assert_eq!(cells[3], Cell::badge("purchase", Tone::Success));
        assert_eq!(cells[4], Cell::Empty);
        assert_eq!(cells[5], Cell::Timestamp("Mar 5, 2024, 02:07 PM".to_string()));
    }

    #[test]
    fn test_missing_timestamp() {
        assert_eq!(Cell::timestamp(None), Cell::Timestamp("N/A".to_string()));
    }

    #[test]
    fn test_cell_wire_format() {
        assert_eq!(
            serde_json::to_value(Cell::badge("click", Tone::Info)).unwrap(),
            json!({"kind": "badge", "value": {"label": "click", "tone": "info"}})
        );
        assert_eq!(serde_json::to_value(Cell::Empty).unwrap(), json!({"kind": "empty"}));
        assert_eq!(
            serde_json::to_value(Cell::Badges(vec!["books".to_string()])).unwrap(),
            json!({"kind": "badges", "value": ["books"]})
        );
    }
}
