//! Plain-text rendering of marketplace pages and the admin table.

use super::controller::{AdminColumn, AdminTable, MarketplaceView};
use super::sort::SortDirection;
use crate::models::{facet_number, Deal};
use std::fmt::Write;

/// Format a dollar amount with thousands separators, no cents
pub fn format_money(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::new();
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0 {
        format!("-${}", out)
    } else {
        format!("${}", out)
    }
}

fn facet_text(value: Option<f64>, suffix: &str) -> Option<String> {
    value.map(|v| format!("{} {}", v, suffix))
}

fn location_line(deal: &Deal) -> String {
    let city_state = [deal.property_city.as_deref(), deal.property_state.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
    [
        deal.property_address.as_deref(),
        Some(city_state.as_str()).filter(|s| !s.is_empty()),
        deal.property_zip.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" · ")
}

/// Render one marketplace page as a numbered list of deal cards
pub fn render_marketplace(view: &MarketplaceView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.location);

    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "⚠️  {}", notice);
    }

    if let Some(message) = view.outcome.empty_state_message() {
        let _ = writeln!(out, "{}", message);
        return out;
    }

    let offset = view.page.page.saturating_sub(1).saturating_mul(view.page.limit);
    for (i, deal) in view.page.items.iter().enumerate() {
        let heart = if view.is_saved(&deal.id) { "♥" } else { "♡" };
        let title = deal.title.as_deref().unwrap_or("Untitled deal");
        let _ = writeln!(out, "{}. {} {}", offset.saturating_add(i + 1), heart, title);

        let asking = deal.asking_price().map(format_money).unwrap_or_else(|| "-".into());
        let entry = deal.entry_cost().map(format_money).unwrap_or_else(|| "-".into());
        let _ = writeln!(out, "   Asking {} · Entry {}", asking, entry);

        let facts: Vec<String> = [
            facet_text(facet_number(deal.bedrooms.as_ref()), "bd"),
            facet_text(facet_number(deal.bathrooms.as_ref()), "ba"),
            facet_text(facet_number(deal.square_feet.as_ref()), "sqft"),
            facet_text(facet_number(deal.lot_size_acres.as_ref()), "ac"),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !facts.is_empty() {
            let _ = writeln!(out, "   {}", facts.join(" · "));
        }

        let location = location_line(deal);
        if !location.is_empty() {
            let _ = writeln!(out, "   {}", location);
        }
        if let Some(deal_type) = deal.deal_type {
            let _ = writeln!(out, "   {}", deal_type.label());
        }
        let _ = writeln!(out, "   ID: {}", deal.id);
    }

    let _ = writeln!(
        out,
        "Page {} of {} · {} deals",
        view.page.page,
        view.page.total_pages.max(1),
        view.page.total_items
    );
    out
}

/// Render the admin table with a sort marker on the active header
pub fn render_admin_table(table: &AdminTable) -> String {
    let mut out = String::new();

    let headers: Vec<String> = AdminColumn::ALL
        .iter()
        .map(|column| {
            let marker = match table.sort_state() {
                Some(state) if state.key == column.sort_key() => match state.direction {
                    SortDirection::Ascending => " ▲",
                    SortDirection::Descending => " ▼",
                },
                _ => "",
            };
            format!("{}{}", column.label(), marker)
        })
        .collect();
    let _ = writeln!(out, "{}", headers.join(" | "));

    if let Some(message) = table.outcome().empty_state_message() {
        let _ = writeln!(out, "{}", message);
        return out;
    }

    for deal in table.rows() {
        let entry_arv = format!(
            "{} / {}",
            deal.entry_cost().map(format_money).unwrap_or_else(|| "-".into()),
            facet_number(deal.arv.as_ref())
                .map(format_money)
                .unwrap_or_else(|| "-".into())
        );
        let cells = [
            deal.title.clone().unwrap_or_default(),
            deal.property_city.clone().unwrap_or_default(),
            deal.deal_type.map(|t| t.label().to_string()).unwrap_or_default(),
            deal.status.map(|s| s.as_str().to_string()).unwrap_or_default(),
            entry_arv,
            facet_number(deal.bedrooms.as_ref())
                .map(|b| b.to_string())
                .unwrap_or_default(),
            deal.wholesaler_name().to_string(),
            deal.created_at.format("%Y-%m-%d").to_string(),
        ];
        let _ = writeln!(out, "{}", cells.join(" | "));
    }
    out
}
