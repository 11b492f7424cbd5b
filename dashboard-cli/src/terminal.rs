//! Terminal rendering of the dashboard view.

use dashboard_core::{Field, MemoryView};

fn label(field: Field) -> &'static str {
    match field {
        Field::City => "City",
        Field::Temperature => "Temperature",
        Field::Description => "Conditions",
        Field::Humidity => "Humidity",
        Field::Wind => "Wind",
    }
}

/// Lines of the weather card, or `None` if nothing has been rendered yet.
pub fn card_lines(view: &MemoryView) -> Option<Vec<String>> {
    if view.is_blank() {
        return None;
    }

    let lines = Field::all()
        .iter()
        .map(|field| {
            let text = view.text(*field).unwrap_or_else(|| "-".to_string());
            format!("{:<12} {}", label(*field), text)
        })
        .collect();

    Some(lines)
}

/// Print pending alerts, then the card.
pub fn draw(view: &MemoryView) {
    for alert in view.take_alerts() {
        eprintln!("⚠️  {alert}");
    }

    if let Some(lines) = card_lines(view) {
        println!();
        for line in lines {
            println!("  {line}");
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use dashboard_core::DashboardView;

    use super::*;

    #[test]
    fn blank_view_has_no_card() {
        assert!(card_lines(&MemoryView::new()).is_none());
    }

    #[test]
    fn card_lists_regions_in_page_order() {
        let view = MemoryView::new();
        view.set_text(Field::City, "📍 Jijel");
        view.set_text(Field::Temperature, "21.7°C");

        let lines = card_lines(&view).unwrap();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("City") && lines[0].ends_with("📍 Jijel"));
        assert!(lines[1].ends_with("21.7°C"));
        assert!(lines[4].starts_with("Wind") && lines[4].ends_with('-'));
    }
}
