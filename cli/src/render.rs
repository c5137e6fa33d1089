use mira_core::{Author, PropertyListing, TranscriptEntry};

/// Terminal rendering of one transcript entry. Free-text user entries are
/// skipped since the user just typed them; quick-filter summaries are shown.
pub fn entry(entry: &TranscriptEntry) -> Option<String> {
    match entry.author {
        Author::User if entry.applied_filters.is_none() => None,
        Author::User => Some(format!("you   > {}", entry.text)),
        Author::Assistant => {
            let mut out = format!("mira  > {}", entry.text);
            if let Some(properties) = &entry.properties {
                for p in properties {
                    out.push('\n');
                    out.push_str(&card(p));
                }
                out.push_str("\n        (save a listing with /save <id>)");
            }
            Some(out)
        }
    }
}

pub fn card(p: &PropertyListing) -> String {
    let mut out = format!(
        "        [{}] {}\n              {} · 📍 {} · 🛏️ {} {}",
        p.id,
        p.title,
        p.price,
        p.location,
        p.bedroom_count,
        if p.bedroom_count == 1 { "bedroom" } else { "bedrooms" }
    );
    if let Some(image) = &p.image_ref {
        out.push_str(&format!("\n              {image}"));
    }
    out
}

pub const HELP: &str = "\
Type what you are looking for, e.g. \"2BHK in Pune under 1Cr\".
Commands:
  /filter location=<city> budget=<range> bedrooms=<n>   quick search
  /save <property-id>                                   save a listing
  /saved                                                list saved listings
  /help                                                 this text
  /quit                                                 leave";

#[cfg(test)]
mod tests {
    use mira_core::QuickFilters;

    use super::*;

    fn listing() -> PropertyListing {
        PropertyListing {
            id: "x1".into(),
            title: "Garden flat".into(),
            price: "₹95L".into(),
            location: "Pune".into(),
            bedroom_count: 1,
            image_ref: None,
        }
    }

    #[test]
    fn free_text_user_entries_are_not_echoed() {
        assert_eq!(entry(&TranscriptEntry::user("hi")), None);
    }

    #[test]
    fn filter_summaries_are_echoed() {
        let e = TranscriptEntry::user("Looking for homes in Pune")
            .with_filters(Some(QuickFilters::new(Some("Pune"), None::<String>, None::<String>)));
        assert_eq!(entry(&e).unwrap(), "you   > Looking for homes in Pune");
    }

    #[test]
    fn assistant_entry_lists_cards() {
        let e = TranscriptEntry::assistant("Here are matches").with_properties(vec![listing()]);
        let text = entry(&e).unwrap();
        assert!(text.starts_with("mira  > Here are matches"));
        assert!(text.contains("[x1] Garden flat"));
        assert!(text.contains("1 bedroom"));
        assert!(text.contains("/save <id>"));
    }
}
