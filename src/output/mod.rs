use serde::Serialize;

use crate::api::Pokemon;
use crate::pagination::PaginationPlan;
use crate::viewer::Screen;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct OutputRecord {
    pub id: u64,
    pub name: String,
    pub height_m: f64,
    pub weight_kg: f64,
    pub abilities: Vec<String>,
    pub types: Vec<String>,
    pub sprite: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct OutputDocument {
    pub page: Option<u64>,
    pub total_pages: Option<u64>,
    pub total_items: Option<u64>,
    pub records: Vec<OutputRecord>,
    pub pagination: PaginationPlan,
}

pub fn build_records(cards: &[Pokemon]) -> Vec<OutputRecord> {
    cards
        .iter()
        .map(|p| OutputRecord {
            id: p.id,
            name: p.name.clone(),
            height_m: p.height_m(),
            weight_kg: p.weight_kg(),
            abilities: p.ability_names().into_iter().map(String::from).collect(),
            types: p.type_names().into_iter().map(String::from).collect(),
            sprite: p.sprite().map(String::from),
        })
        .collect()
}

pub fn build_document(screen: &Screen) -> OutputDocument {
    match screen {
        Screen::Page {
            cards,
            plan,
            page,
            total_pages,
            total_items,
        } => OutputDocument {
            page: Some(*page),
            total_pages: Some(*total_pages),
            total_items: Some(*total_items),
            records: build_records(cards),
            pagination: plan.clone(),
        },
        Screen::SearchHit { card } | Screen::Details(card) => OutputDocument {
            page: None,
            total_pages: None,
            total_items: None,
            records: build_records(std::slice::from_ref(card)),
            pagination: PaginationPlan::default(),
        },
        Screen::NotFound { .. } | Screen::Help | Screen::Quit => OutputDocument {
            page: None,
            total_pages: None,
            total_items: None,
            records: Vec::new(),
            pagination: PaginationPlan::default(),
        },
    }
}

pub fn render_text(doc: &OutputDocument) -> Vec<u8> {
    let mut out = String::new();
    for r in doc.records.iter() {
        out.push_str(&format!("#{} {}\n", r.id, r.name));
    }
    out.into_bytes()
}

pub fn render_json(doc: &OutputDocument) -> Vec<u8> {
    serde_json::to_vec_pretty(doc).unwrap_or_else(|_| b"{}\n".to_vec())
}

pub fn render(doc: &OutputDocument, format: OutputFormat) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(doc),
        OutputFormat::Json => render_json(doc),
    }
}
