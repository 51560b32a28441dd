//! End-to-end extraction over synthetic Modelo 190 page texts.

use std::str::FromStr;

use m190_core::extract::rules::{find_nth_amount, normalize_amount, parse_identity, segment_recipients};
use m190_core::{
    AmountField, M190Config, Modelo190Parser, RecipientRecord, extract_document, extract_document_into,
    read_pages,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn recipient(ordinal: u32, nif: &str, name: &str, amounts: [&str; 4]) -> String {
    format!(
        "Percepción {ordinal}\n\
         {nif} {name} 28 Clave: A Subclave: 01\n\
         Dinerarias no derivadas de incapacidad laboral\n\
         Percepción íntegra {} Retenciones practicadas 0,00\n\
         En especie no derivadas de incapacidad laboral\n\
         Valoración {} Ingresos a cuenta efectuados 0,00\n\
         Dinerarias derivadas de incapacidad laboral\n\
         Percepción íntegra {} Retenciones practicadas 0,00\n\
         En especie derivadas de incapacidad laboral\n\
         Valoración {} Ingresos a cuenta efectuados 0,00\n",
        amounts[0], amounts[1], amounts[2], amounts[3]
    )
}

fn summary_page() -> String {
    "MODELO 190 - Resumen anual\n\
     Ejercicio 2024\n\
     NIF del declarante\n\
     B12345678\n\
     Apellidos y nombre, denominación o razón social del declarante\n\
     x\n\
     EJEMPLO CONSULTORES SL\n\
     Teléfono 910000000\n"
        .to_string()
}

#[test]
fn normalizer_properties() {
    assert_eq!(normalize_amount(""), Decimal::ZERO);
    assert_eq!(normalize_amount("abc"), Decimal::ZERO);
    assert_eq!(normalize_amount("1.234,56"), dec("1234.56"));
}

#[test]
fn locator_properties() {
    let block = "Percepción íntegra 1.000,00 ... Percepción íntegra 50,00";
    assert_eq!(find_nth_amount(block, "Percepción íntegra", 1), dec("1000.00"));
    assert_eq!(find_nth_amount(block, "Percepción íntegra", 2), dec("50.00"));
    assert_eq!(find_nth_amount(block, "Percepción íntegra", 3), Decimal::ZERO);
}

#[test]
fn segmenter_and_identity_properties() {
    assert!(segment_recipients("no markers here").is_empty());

    assert!(parse_identity("sin identificación").is_none());
    let id = parse_identity("12345678A JOHN DOE 02").unwrap();
    assert_eq!(id.tax_id, "12345678A");
    assert_eq!(id.name, "JOHN DOE");
}

#[test]
fn two_page_document_yields_one_complete_record() {
    let page1 = format!(
        "AGENCIA TRIBUTARIA\n{}",
        recipient(1, "12345678A", "JOHN DOE", ["1.000,00", "4.536,48", "66,68", "12,00"])
    );
    let pages = vec![page1, summary_page()];

    let records = extract_document(&pages, "declaracion.pdf");

    assert_eq!(
        records,
        vec![RecipientRecord {
            source_document: "declaracion.pdf".to_string(),
            page_number: 1,
            filer_tax_id: Some("B12345678".to_string()),
            filer_name: Some("EJEMPLO CONSULTORES SL".to_string()),
            recipient_tax_id: "12345678A".to_string(),
            recipient_name: "JOHN DOE".to_string(),
            category_code: "A".to_string(),
            subcategory_code: "01".to_string(),
            monetary_noil: dec("1000.00"),
            inkind_noil: dec("4536.48"),
            monetary_il: dec("66.68"),
            inkind_il: dec("12.00"),
            absent_amounts: Vec::new(),
        }]
    );
}

#[test]
fn multiple_blocks_keep_source_order() {
    let page = format!(
        "{}{}{}",
        recipient(1, "11111111H", "ANA UNO", ["1,00", "0,00", "0,00", "0,00"]),
        recipient(2, "22222222J", "BEA DOS", ["2,00", "0,00", "0,00", "0,00"]),
        recipient(3, "33333333P", "CARLOS TRES", ["3,00", "0,00", "0,00", "0,00"]),
    );

    let records = extract_document(&[page.as_str(), summary_page().as_str()], "orden.pdf");

    let names: Vec<&str> = records.iter().map(|r| r.recipient_name.as_str()).collect();
    assert_eq!(names, vec!["ANA UNO", "BEA DOS", "CARLOS TRES"]);
    assert_eq!(records[2].monetary_noil, dec("3.00"));
}

#[test]
fn invalid_block_is_skipped_without_aborting() {
    let page = format!(
        "{}Percepción 2\nbloque sin identificación válida\n{}",
        recipient(1, "11111111H", "ANA UNO", ["1,00", "0,00", "0,00", "0,00"]),
        recipient(3, "33333333P", "CARLOS TRES", ["3,00", "0,00", "0,00", "0,00"]),
    );

    let extraction = Modelo190Parser::new().extract(&[page.as_str()], "mixto.pdf");

    assert_eq!(extraction.records.len(), 2);
    assert_eq!(extraction.report.candidate_blocks, 3);
    assert_eq!(extraction.report.dropped_blocks, 1);
    assert_eq!(extraction.records[1].recipient_tax_id, "33333333P");
}

#[test]
fn same_recipient_on_several_pages_is_not_deduplicated() {
    let page = recipient(1, "11111111H", "ANA UNO", ["1,00", "0,00", "0,00", "0,00"]);
    let pages = vec![page.clone(), summary_page(), page];

    let records = extract_document(&pages, "repetido.pdf");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].page_number, 1);
    assert_eq!(records[1].page_number, 3);
}

#[test]
fn caller_owned_collection_accumulates_documents() {
    let doc_a = vec![
        recipient(1, "11111111H", "ANA UNO", ["1,00", "0,00", "0,00", "0,00"]),
        summary_page(),
    ];
    let doc_b = vec![recipient(1, "22222222J", "BEA DOS", ["2,00", "0,00", "0,00", "0,00"])];

    let mut consolidated = Vec::new();
    extract_document_into(&doc_a, "a.pdf", &mut consolidated);
    let report_b = extract_document_into(&doc_b, "b.pdf", &mut consolidated);

    assert_eq!(consolidated.len(), 2);
    assert_eq!(consolidated[0].filer_tax_id.as_deref(), Some("B12345678"));
    assert_eq!(consolidated[1].filer_tax_id, None);
    assert_eq!(report_b.records, 1);
    assert_eq!(
        consolidated[1].amount_if_present(AmountField::MonetaryNoIl),
        Some(dec("2.00"))
    );
}

#[test]
fn parser_from_default_config_matches_standard_parser() {
    let page = recipient(1, "11111111H", "ANA UNO", ["1.500,00", "0,00", "7,25", "0,00"]);
    let pages = vec![page, summary_page()];

    let configured = Modelo190Parser::from_config(&M190Config::default().extraction).unwrap();
    assert_eq!(
        configured.extract(&pages, "cfg.pdf").records,
        extract_document(&pages, "cfg.pdf")
    );
}

#[test]
fn blank_pages_keep_summary_position_and_page_numbers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("con_blanco.txt");

    let summary = "NIF del declarante\nB12345678\nRazón social\nACME SL\n";
    let mut recipients = recipient(1, "11111111H", "ANA UNO", ["1,00", "0,00", "0,00", "0,00"]);
    recipients.push_str("NIF del declarante\nA99999999\nRazón social\nOTRA SA\n");
    std::fs::write(&path, format!("  \u{000C}{summary}\u{000C}{recipients}")).unwrap();

    let pages = read_pages(&path, &M190Config::default().pdf).unwrap();
    assert_eq!(pages.len(), 3);

    let records = extract_document(&pages, "con_blanco.txt");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].page_number, 3);
    assert_eq!(records[0].filer_tax_id.as_deref(), Some("B12345678"));
    assert_eq!(records[0].filer_name.as_deref(), Some("ACME SL"));
}
