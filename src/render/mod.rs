use colored::Colorize;
use itertools::Itertools;

use crate::api::Pokemon;
use crate::pagination::{PageControl, PaginationPlan};
use crate::viewer::Screen;

const CARD_WIDTH: usize = 22;

#[derive(Clone, Copy, Debug)]
pub struct RenderStyle {
    pub columns: usize,
    pub color: bool,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            columns: 4,
            color: true,
        }
    }
}

fn paint(text: &str, color: bool, f: impl Fn(&str) -> colored::ColoredString) -> String {
    if color {
        f(text).to_string()
    } else {
        text.to_string()
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

fn card_line(line_idx: usize, number: usize, card: &Pokemon, inner: usize) -> String {
    match line_idx {
        0 => pad(&format!("{number}."), inner),
        1 => pad(&truncate(&card.name, inner), inner),
        _ => {
            let kind = card.type_names().first().copied().unwrap_or("");
            let id = format!("#{}", card.id);
            let kind = truncate(kind, inner.saturating_sub(id.len() + 1));
            let gap = inner.saturating_sub(id.len() + kind.chars().count());
            format!("{}{}{}", id, " ".repeat(gap), kind)
        }
    }
}

/// Renders cards as a grid of boxed cells, numbered from 1 in reading order.
pub fn render_grid(cards: &[Pokemon], columns: usize, color: bool) -> String {
    let columns = columns.max(1);
    let inner = CARD_WIDTH - 2;
    let mut out = String::new();

    for (row_idx, row) in cards.chunks(columns).enumerate() {
        let border = row
            .iter()
            .map(|_| format!("+{}+", "-".repeat(inner)))
            .join(" ");
        out.push_str(&border);
        out.push('\n');

        for line_idx in 0..3 {
            let cells = row
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    let text = card_line(line_idx, row_idx * columns + i + 1, p, inner);
                    let text = if line_idx == 1 {
                        paint(&text, color, |s| s.bold())
                    } else {
                        paint(&text, color, |s| s.dimmed())
                    };
                    format!("|{}|", text)
                })
                .join(" ");
            out.push_str(&cells);
            out.push('\n');
        }

        out.push_str(&border);
        out.push('\n');
    }
    out
}

/// Renders the pagination bar. The active page is bracketed.
pub fn render_pagination(plan: &PaginationPlan, color: bool) -> String {
    plan.iter()
        .map(|control| match control {
            PageControl::PreviousButton => paint("< Previous", color, |s| s.cyan()),
            PageControl::NextButton => paint("Next >", color, |s| s.cyan()),
            PageControl::Ellipsis => "...".to_string(),
            PageControl::PageButton {
                page_number,
                is_active: true,
            } => paint(&format!("[{page_number}]"), color, |s| {
                s.bold().white().on_red()
            }),
            PageControl::PageButton { page_number, .. } => page_number.to_string(),
        })
        .join(" ")
}

/// Expanded view of one record.
pub fn render_details(card: &Pokemon, color: bool) -> String {
    let mut out = String::new();
    let title = paint(&card.display_name(), color, |s| s.bold().red());
    out.push_str(&format!("{}  #{}\n", title, card.id));
    out.push_str(&format!("  Sprite : {}\n", card.sprite().unwrap_or("-")));
    out.push('\n');
    out.push_str(&paint("Stats", color, |s| s.bold()));
    out.push('\n');
    out.push_str(&format!("  Height : {}m\n", card.height_m()));
    out.push_str(&format!("  Weight : {}kg\n", card.weight_kg()));
    out.push('\n');
    out.push_str(&paint("Abilities", color, |s| s.bold()));
    out.push('\n');
    for ability in card.ability_names() {
        out.push_str(&format!("  - {ability}\n"));
    }
    out.push('\n');
    out.push_str(&paint("Types", color, |s| s.bold()));
    out.push('\n');
    out.push_str("  ");
    out.push_str(
        &card
            .type_names()
            .into_iter()
            .map(|t| paint(&format!("[{t}]"), color, |s| s.yellow()))
            .join(" "),
    );
    out.push('\n');
    out
}

pub fn render_help() -> String {
    [
        "Commands:",
        "  n, next                 next page",
        "  p, prev                 previous page",
        "  g <n>, page <n>, <n>    go to page n",
        "  s <name>, search <name> look up an entry by name",
        "  c, clear                clear the search and list page 1",
        "  size <n>                change the page size",
        "  d <n>, details <n>      show details for card n",
        "  x, close                close the detail view",
        "  r, refresh              reload the current screen",
        "  h, help                 this help",
        "  q, quit                 exit",
    ]
    .join("\n")
        + "\n"
}

pub fn render_screen(screen: &Screen, style: RenderStyle) -> String {
    match screen {
        Screen::Page {
            cards,
            plan,
            page,
            total_pages,
            total_items,
        } => {
            let mut out = render_grid(cards, style.columns, style.color);
            out.push('\n');
            out.push_str(&render_pagination(plan, style.color));
            out.push('\n');
            out.push_str(&format!(
                ":: Page {page}/{total_pages} :: {total_items} entries\n"
            ));
            out
        }
        Screen::SearchHit { card } => render_grid(std::slice::from_ref(card), 1, style.color),
        Screen::NotFound { term } => {
            let msg = format!("No entry named '{term}' found");
            format!("{}\n", paint(&msg, style.color, |s| s.red()))
        }
        Screen::Details(card) => render_details(card, style.color),
        Screen::Help => render_help(),
        Screen::Quit => String::new(),
    }
}
