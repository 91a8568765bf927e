//! Property tests for contact card parsing

use contactsync_core::import::CardTextImporter;
use proptest::prelude::*;

fn word() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,10}"
}

proptest! {
    /// Property: a formatted name is taken verbatim
    #[test]
    fn formatted_name_is_identity(given in word(), family in word()) {
        let text = format!("BEGIN:VCARD\r\nVERSION:3.0\r\nFN:{given} {family}\r\nEND:VCARD\r\n");
        let records = CardTextImporter::parse(&text);
        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(&records[0].identity, &format!("{given} {family}"));
        prop_assert!(records[0].selected);
    }

    /// Property: without FN the structured name reads given then family
    #[test]
    fn structured_name_is_given_then_family(given in word(), family in word()) {
        let text = format!("BEGIN:VCARD\nN:{family};{given};;;\nEND:VCARD\n");
        let records = CardTextImporter::parse(&text);
        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(&records[0].identity, &format!("{given} {family}"));
    }

    /// Property: every named card becomes one record, nameless ones vanish
    #[test]
    fn one_record_per_named_card(names in prop::collection::vec(prop::option::of(word()), 0..10)) {
        let text: String = names
            .iter()
            .map(|name| match name {
                Some(n) => format!("BEGIN:VCARD\nFN:{n}\nEMAIL:{n}@example.com\nEND:VCARD\n"),
                None => "BEGIN:VCARD\nEMAIL:nobody@example.com\nEND:VCARD\n".to_string(),
            })
            .collect();

        let records = CardTextImporter::parse(&text);
        let expected: Vec<&String> = names.iter().flatten().collect();
        prop_assert_eq!(records.len(), expected.len());
        for (record, name) in records.iter().zip(expected) {
            prop_assert_eq!(&record.identity, name);
            prop_assert_eq!(record.email.clone(), Some(format!("{name}@example.com")));
        }
    }

    /// Property: arbitrary text never panics the parser
    #[test]
    fn parser_is_total(text in "\\PC{0,200}") {
        let _ = CardTextImporter::parse(&text);
    }
}
