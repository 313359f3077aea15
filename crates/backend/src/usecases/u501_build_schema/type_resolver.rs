//! Вывод канонического отображаемого типа поля из сырых метаданных.
//!
//! Правила проверяются по порядку: ссылка, список выбора, строка, целое,
//! булево, и общий вариант для всего остального. Функция чистая и не падает.

use super::models::FieldDescribe;

const LIST_SEPARATOR: &str = ", ";

/// Каноническая строка типа данных для поля
pub fn resolve(field: &FieldDescribe) -> String {
    match field.field_type.as_str() {
        "reference" => {
            let targets: Vec<String> = field.reference_to.iter().map(|t| title_case(t)).collect();
            format!("Lookup ({})", targets.join(LIST_SEPARATOR))
        }
        "picklist" | "multipicklist" => {
            let labels: Vec<&str> = field.picklist_values.iter().map(|p| p.display()).collect();
            format!(
                "{} ({})",
                title_case(&field.field_type),
                labels.join(LIST_SEPARATOR)
            )
        }
        "string" => format!("Text ({})", field.length.unwrap_or(0)),
        "int" => format!("Number ({}, 0)", field.digits.unwrap_or(0)),
        "boolean" => "Checkbox".to_string(),
        other => resolve_generic(other, field),
    }
}

fn resolve_generic(raw_type: &str, field: &FieldDescribe) -> String {
    let mut data_type = title_case(raw_type);
    if data_type == "Double" {
        data_type = "Number".to_string();
    }

    // Источник не заполняет length и precision одновременно, но проверяем независимо
    if let Some(length) = field.length.filter(|l| *l > 0) {
        data_type.push_str(&format!(" ({})", length));
    }
    if let Some(precision) = field.precision.filter(|p| *p > 0) {
        let scale = field.scale.unwrap_or(0);
        data_type.push_str(&format!(" ({}, {})", precision - scale, scale));
    }

    data_type
}

/// Буква после не-буквы (или в начале) становится заглавной, остальные строчными
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u501_build_schema::models::PicklistValue;

    fn field(field_type: &str) -> FieldDescribe {
        FieldDescribe {
            name: "Test__c".into(),
            label: "Test".into(),
            field_type: field_type.into(),
            ..Default::default()
        }
    }

    fn picklist(labels: &[&str]) -> Vec<PicklistValue> {
        labels
            .iter()
            .map(|l| PicklistValue {
                label: Some(l.to_string()),
                value: Some(l.to_lowercase()),
            })
            .collect()
    }

    #[test]
    fn test_boolean_is_checkbox() {
        let mut f = field("boolean");
        f.length = Some(0);
        f.precision = Some(5);
        assert_eq!(resolve(&f), "Checkbox");
    }

    #[test]
    fn test_lookup_single_and_polymorphic() {
        let mut f = field("reference");
        f.reference_to = vec!["Account".into()];
        assert_eq!(resolve(&f), "Lookup (Account)");

        f.reference_to = vec!["Account".into(), "Contact".into()];
        assert_eq!(resolve(&f), "Lookup (Account, Contact)");

        f.reference_to = vec!["user".into(), "GROUP".into()];
        assert_eq!(resolve(&f), "Lookup (User, Group)");
    }

    #[test]
    fn test_lookup_without_targets_is_not_truncated() {
        let f = field("reference");
        assert_eq!(resolve(&f), "Lookup ()");

        let mut f = field("reference");
        f.reference_to = vec!["X".into()];
        assert_eq!(resolve(&f), "Lookup (X)");
    }

    #[test]
    fn test_picklists() {
        let mut f = field("picklist");
        f.picklist_values = picklist(&["A", "B"]);
        assert_eq!(resolve(&f), "Picklist (A, B)");

        let mut f = field("multipicklist");
        f.picklist_values = picklist(&["Red", "Green", "Blue"]);
        assert_eq!(resolve(&f), "Multipicklist (Red, Green, Blue)");

        assert_eq!(resolve(&field("picklist")), "Picklist ()");
    }

    #[test]
    fn test_text_and_integer() {
        let mut f = field("string");
        f.length = Some(80);
        assert_eq!(resolve(&f), "Text (80)");

        let mut f = field("int");
        f.digits = Some(5);
        assert_eq!(resolve(&f), "Number (5, 0)");
    }

    #[test]
    fn test_generic_fallback() {
        assert_eq!(resolve(&field("double")), "Number");
        assert_eq!(resolve(&field("date")), "Date");
        assert_eq!(resolve(&field("datetime")), "Datetime");

        let mut f = field("currency");
        f.precision = Some(18);
        f.scale = Some(2);
        assert_eq!(resolve(&f), "Currency (16, 2)");

        let mut f = field("double");
        f.precision = Some(10);
        f.scale = Some(4);
        assert_eq!(resolve(&f), "Number (6, 4)");

        let mut f = field("textarea");
        f.length = Some(32768);
        assert_eq!(resolve(&f), "Textarea (32768)");

        let mut f = field("id");
        f.length = Some(0);
        f.precision = Some(0);
        assert_eq!(resolve(&f), "Id");
    }

    #[test]
    fn test_generic_suffixes_are_independent() {
        let mut f = field("percent");
        f.length = Some(3);
        f.precision = Some(5);
        f.scale = Some(2);
        assert_eq!(resolve(&f), "Percent (3) (3, 2)");
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let mut f = field("reference");
        f.reference_to = vec!["Account".into(), "Lead".into()];
        assert_eq!(resolve(&f), resolve(&f));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("account"), "Account");
        assert_eq!(title_case("ContentVersion"), "Contentversion");
        assert_eq!(title_case("my_obj__c"), "My_Obj__C");
        assert_eq!(title_case("abc1def"), "Abc1Def");
        assert_eq!(title_case(""), "");
    }
}
