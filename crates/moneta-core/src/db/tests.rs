//! Database tests

use super::*;
use crate::classify::Classifier;
use crate::error::Error;
use crate::models::*;

use chrono::NaiveDate;
use rusqlite::params;

fn setup() -> (Database, i64) {
    let db = Database::in_memory().unwrap();
    let user_id = db.register_user("ana@example.com").unwrap();
    (db, user_id)
}

fn new_record(date: &str, description: &str, amount: f64) -> NewRecord {
    NewRecord {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        description: description.to_string(),
        amount,
        source: TransactionSource::Manual,
    }
}

fn monthly(name: &str, amount: f64, category: &str, day: u32) -> NewRecurringTemplate {
    NewRecurringTemplate {
        name: name.to_string(),
        amount,
        category: category.to_string(),
        schedule: Schedule::Monthly,
        day_of_month: day,
        active: true,
    }
}

// ========== Database ==========

#[test]
fn test_in_memory_files_removed_with_last_handle() {
    let db = Database::in_memory().unwrap();
    db.register_user("ana@example.com").unwrap();

    let path = std::path::PathBuf::from(db.path());
    let dir = path.parent().unwrap().to_path_buf();
    assert!(path.exists());

    let clone = db.clone();
    drop(db);
    assert!(path.exists());
    assert!(clone.get_user_by_email("ana@example.com").unwrap().is_some());

    drop(clone);
    assert!(!dir.exists());
}

#[test]
fn test_in_memory_databases_are_isolated() {
    let a = Database::in_memory().unwrap();
    let b = Database::in_memory().unwrap();
    assert_ne!(a.path(), b.path());

    a.register_user("ana@example.com").unwrap();
    assert!(b.list_users().unwrap().is_empty());
}

// ========== Users ==========

#[test]
fn test_register_user() {
    let db = Database::in_memory().unwrap();
    let id = db.register_user("  Ana@Example.com ").unwrap();
    assert!(id > 0);

    let user = db.get_user_by_email("ANA@example.COM").unwrap().unwrap();
    assert_eq!(user.id, id);
    assert_eq!(user.email, "ana@example.com");
    assert!(user.is_active);
}

#[test]
fn test_register_duplicate_email() {
    let (db, _) = setup();
    let err = db.register_user("ANA@example.com").unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));
}

#[test]
fn test_register_invalid_email() {
    let db = Database::in_memory().unwrap();
    assert!(matches!(db.register_user("   "), Err(Error::InvalidData(_))));
    assert!(matches!(db.register_user("ana"), Err(Error::InvalidData(_))));
}

#[test]
fn test_deactivate_user() {
    let (db, _) = setup();
    db.deactivate_user("ana@example.com").unwrap();
    assert!(db.get_user_by_email("ana@example.com").unwrap().is_none());
    assert_eq!(db.list_users().unwrap().len(), 1);
    assert!(matches!(
        db.deactivate_user("nobody@example.com"),
        Err(Error::NotFound(_))
    ));
}

// ========== Rules ==========

#[test]
fn test_upsert_rule_normalizes_and_overwrites() {
    let (db, user) = setup();

    let first = db.upsert_rule(user, "  gym   smart ", "Salud").unwrap();
    assert_eq!(first.pattern, "GYM SMART");

    let second = db.upsert_rule(user, "GYM SMART", "Deporte").unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.category, "Deporte");

    let rules = db.list_rules(user).unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].category, "Deporte");
}

#[test]
fn test_rules_keep_insertion_order() {
    let (db, user) = setup();
    db.upsert_rule(user, "amazon", "Compras").unwrap();
    db.upsert_rule(user, "amazon prime", "Suscripciones").unwrap();
    // Overwriting does not move a rule to the end
    db.upsert_rule(user, "amazon", "Hogar").unwrap();

    let rules = db.learned_rules(user).unwrap();
    assert_eq!(
        rules,
        vec![
            LearnedRule::new("AMAZON", "Hogar"),
            LearnedRule::new("AMAZON PRIME", "Suscripciones"),
        ]
    );
}

#[test]
fn test_rules_are_per_user() {
    let (db, ana) = setup();
    let beto = db.register_user("beto@example.com").unwrap();

    db.upsert_rule(ana, "uber", "Trabajo").unwrap();
    db.upsert_rule(beto, "uber", "Ocio").unwrap();

    assert_eq!(db.learned_rules(ana).unwrap()[0].category, "Trabajo");
    assert_eq!(db.learned_rules(beto).unwrap()[0].category, "Ocio");
}

#[test]
fn test_upsert_rule_rejects_empty() {
    let (db, user) = setup();
    assert!(matches!(
        db.upsert_rule(user, "   ", "Salud"),
        Err(Error::InvalidData(_))
    ));
    assert!(matches!(
        db.upsert_rule(user, "GYM", " "),
        Err(Error::InvalidData(_))
    ));
}

#[test]
fn test_delete_rule() {
    let (db, user) = setup();
    let rule = db.upsert_rule(user, "gym", "Salud").unwrap();
    let other = db.register_user("beto@example.com").unwrap();

    assert!(matches!(
        db.delete_rule(other, rule.id),
        Err(Error::NotFound(_))
    ));
    db.delete_rule(user, rule.id).unwrap();
    assert!(db.list_rules(user).unwrap().is_empty());
}

// ========== Records ==========

#[test]
fn test_add_records_classifies() {
    let (db, user) = setup();
    let classifier = Classifier::default();

    let added = db
        .add_records(
            user,
            &[
                new_record("2026-01-15", "NOMINA ACME", 20000.0),
                new_record("2026-01-16", "UBER *TRIP", -150.0),
                new_record("2026-01-17", "LIBRERIA", -300.0),
            ],
            &classifier,
        )
        .unwrap();
    assert_eq!(added.len(), 3);

    let records = db.list_records(user, "2026-01", RecordKind::All).unwrap();
    let listed_ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    assert_eq!(listed_ids, added);
    let got: Vec<_> = records
        .iter()
        .map(|r| (r.category.as_str(), r.confidence))
        .collect();
    assert_eq!(
        got,
        vec![("Ingreso", 0.90), ("Transporte", 0.85), ("Otros", 0.55)]
    );
    assert!(records.iter().all(|r| r.source == TransactionSource::Manual));
}

#[test]
fn test_add_records_uses_learned_rules() {
    let (db, user) = setup();
    db.upsert_rule(user, "uber eats", "Restaurantes").unwrap();

    db.add_records(
        user,
        &[new_record("2026-01-10", "Uber Eats pedido", -250.0)],
        &Classifier::default(),
    )
    .unwrap();

    let record = &db.list_records(user, "2026-01", RecordKind::All).unwrap()[0];
    assert_eq!(record.category, "Restaurantes");
    assert_eq!(record.confidence, 1.0);
}

#[test]
fn test_add_records_keeps_source() {
    let (db, user) = setup();
    let mut item = new_record("2026-01-10", "OXXO", -45.0);
    item.source = TransactionSource::Import;
    db.add_records(user, &[item], &Classifier::default()).unwrap();

    assert_eq!(db.count_records(user, TransactionSource::Import).unwrap(), 1);
    assert_eq!(db.count_records(user, TransactionSource::Manual).unwrap(), 0);
}

#[test]
fn test_add_records_unknown_user_fails_atomically() {
    let (db, user) = setup();
    let result = db.add_records(
        user + 100,
        &[new_record("2026-01-10", "OXXO", -45.0)],
        &Classifier::default(),
    );
    assert!(result.is_err());

    let conn = db.conn().unwrap();
    let total: i64 = conn
        .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))
        .unwrap();
    assert_eq!(total, 0);
}

#[test]
fn test_list_records_by_month_and_kind() {
    let (db, user) = setup();
    db.add_records(
        user,
        &[
            new_record("2026-02-01", "SUELDO", 100.0),
            new_record("2026-01-31", "OXXO", -10.0),
            new_record("2026-01-05", "SUELDO", 1000.0),
            new_record("2026-01-20", "WALMART", -400.0),
        ],
        &Classifier::default(),
    )
    .unwrap();

    let all = db.list_records(user, "2026-01", RecordKind::All).unwrap();
    let dates: Vec<_> = all.iter().map(|r| r.date.to_string()).collect();
    assert_eq!(dates, vec!["2026-01-05", "2026-01-20", "2026-01-31"]);

    let income = db.list_records(user, "2026-01", RecordKind::Income).unwrap();
    assert_eq!(income.len(), 1);
    assert_eq!(income[0].amount, 1000.0);

    let expense = db.list_records(user, "2026-01", RecordKind::Expense).unwrap();
    assert_eq!(expense.len(), 2);

    assert!(db
        .list_records(user, "2026-0_", RecordKind::All)
        .unwrap()
        .is_empty());
    assert!(db.list_records(user, "junk", RecordKind::All).unwrap().is_empty());
}

#[test]
fn test_records_are_per_user() {
    let (db, ana) = setup();
    let beto = db.register_user("beto@example.com").unwrap();
    db.add_records(
        ana,
        &[new_record("2026-01-05", "OXXO", -10.0)],
        &Classifier::default(),
    )
    .unwrap();

    assert!(db.list_records(beto, "2026-01", RecordKind::All).unwrap().is_empty());
    let id = db.list_records(ana, "2026-01", RecordKind::All).unwrap()[0].id;
    assert!(db.get_record(beto, id).unwrap().is_none());
    assert!(db.get_record(ana, id).unwrap().is_some());
}

#[test]
fn test_correct_category_learns_rule() {
    let (db, user) = setup();
    let classifier = Classifier::default();
    db.add_records(
        user,
        &[new_record("2026-01-05", "  Gym  Smart Polanco ", -600.0)],
        &classifier,
    )
    .unwrap();
    let record = db.list_records(user, "2026-01", RecordKind::All).unwrap()[0].clone();
    assert_eq!(record.category, "Otros");

    let result = db.correct_category(user, record.id, " Salud ").unwrap();
    assert_eq!(result.category, "Salud");
    assert_eq!(
        result.rule,
        Some(LearnedRule::new("GYM SMART POLANCO", "Salud"))
    );

    let corrected = db.get_record(user, record.id).unwrap().unwrap();
    assert_eq!(corrected.category, "Salud");
    assert_eq!(corrected.confidence, 1.0);

    // Future records with the same description are classified by the rule
    db.add_records(
        user,
        &[new_record("2026-02-05", "GYM SMART POLANCO", -600.0)],
        &classifier,
    )
    .unwrap();
    let next = &db.list_records(user, "2026-02", RecordKind::All).unwrap()[0];
    assert_eq!(next.category, "Salud");
    assert_eq!(next.confidence, 1.0);
}

#[test]
fn test_correct_category_overwrites_rule() {
    let (db, user) = setup();
    db.add_records(
        user,
        &[new_record("2026-01-05", "SPEI ENVIADO", -100.0)],
        &Classifier::default(),
    )
    .unwrap();
    let id = db.list_records(user, "2026-01", RecordKind::All).unwrap()[0].id;

    db.correct_category(user, id, "Familia").unwrap();
    db.correct_category(user, id, "Ahorro").unwrap();

    let rules = db.list_rules(user).unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].category, "Ahorro");
}

#[test]
fn test_correct_category_errors() {
    let (db, user) = setup();
    let other = db.register_user("beto@example.com").unwrap();
    db.add_records(
        user,
        &[new_record("2026-01-05", "OXXO", -10.0)],
        &Classifier::default(),
    )
    .unwrap();
    let id = db.list_records(user, "2026-01", RecordKind::All).unwrap()[0].id;

    assert!(matches!(
        db.correct_category(other, id, "Salud"),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        db.correct_category(user, id, "  "),
        Err(Error::InvalidData(_))
    ));
    assert!(db.list_rules(other).unwrap().is_empty());
    assert!(db.list_rules(user).unwrap().is_empty());
}

#[test]
fn test_correct_empty_description_skips_rule() {
    let (db, user) = setup();
    db.add_records(
        user,
        &[new_record("2026-01-05", "   ", -10.0)],
        &Classifier::default(),
    )
    .unwrap();
    let id = db.list_records(user, "2026-01", RecordKind::All).unwrap()[0].id;

    let result = db.correct_category(user, id, "Varios").unwrap();
    assert!(result.rule.is_none());
    assert!(db.list_rules(user).unwrap().is_empty());
}

#[test]
fn test_delete_record() {
    let (db, user) = setup();
    db.add_records(
        user,
        &[new_record("2026-01-05", "OXXO", -10.0)],
        &Classifier::default(),
    )
    .unwrap();
    let id = db.list_records(user, "2026-01", RecordKind::All).unwrap()[0].id;

    db.delete_record(user, id).unwrap();
    assert!(db.get_record(user, id).unwrap().is_none());
    assert!(matches!(db.delete_record(user, id), Err(Error::NotFound(_))));
}

#[test]
fn test_confidence_constraint() {
    let (db, user) = setup();
    let conn = db.conn().unwrap();
    let result = conn.execute(
        "INSERT INTO records (user_id, date, description, amount, category, confidence) VALUES (?, '2026-01-01', 'X', 1.0, 'Y', 1.5)",
        params![user],
    );
    assert!(result.is_err());
}

// ========== Recurring ==========

#[test]
fn test_create_recurring() {
    let (db, user) = setup();
    let created = db
        .create_recurring(user, &monthly("  Nómina ", 20000.0, " Ingreso ", 31))
        .unwrap();

    assert_eq!(created.name, "Nómina");
    assert_eq!(created.category, "Ingreso");
    assert_eq!(created.day_of_month, 31);
    assert_eq!(created.schedule, Schedule::Monthly);
    assert!(created.active);

    assert_eq!(db.list_recurring(user).unwrap().len(), 1);
}

#[test]
fn test_create_recurring_rejects_invalid() {
    let (db, user) = setup();

    let mut weekly = monthly("Despensa", -900.0, "Super", 1);
    weekly.schedule = Schedule::Weekly;
    assert!(matches!(
        db.create_recurring(user, &weekly),
        Err(Error::InvalidData(_))
    ));
    assert!(matches!(
        db.create_recurring(user, &monthly(" ", -1.0, "Super", 1)),
        Err(Error::InvalidData(_))
    ));
    assert!(matches!(
        db.create_recurring(user, &monthly("Renta", -1.0, "", 1)),
        Err(Error::InvalidData(_))
    ));
    assert!(matches!(
        db.create_recurring(user, &monthly("Renta", -1.0, "Renta", 0)),
        Err(Error::InvalidData(_))
    ));
    assert!(matches!(
        db.create_recurring(user, &monthly("Renta", -1.0, "Renta", 32)),
        Err(Error::InvalidData(_))
    ));
    assert!(db.list_recurring(user).unwrap().is_empty());
}

#[test]
fn test_generate_recurring_is_idempotent() {
    let (db, user) = setup();
    db.create_recurring(user, &monthly("Nómina", 20000.0, "Ingreso", 15))
        .unwrap();
    db.create_recurring(user, &monthly("Renta", -8000.0, "Renta/Hipoteca", 31))
        .unwrap();

    assert_eq!(db.generate_recurring(user, "2026-02").unwrap(), 2);
    assert_eq!(db.generate_recurring(user, "2026-02").unwrap(), 0);

    let records = db.list_records(user, "2026-02", RecordKind::All).unwrap();
    assert_eq!(records.len(), 2);
    let renta = records.iter().find(|r| r.amount < 0.0).unwrap();
    assert_eq!(renta.date.to_string(), "2026-02-28");
    assert_eq!(renta.description, "[REC] Renta");
    assert_eq!(renta.category, "Renta/Hipoteca");
    assert_eq!(renta.confidence, 1.0);
    assert_eq!(renta.source, TransactionSource::Recurring);

    assert_eq!(db.generate_recurring(user, "2026-03").unwrap(), 2);
}

#[test]
fn test_generate_recurring_skips_paused() {
    let (db, user) = setup();
    let netflix = db
        .create_recurring(user, &monthly("Netflix", -199.0, "Suscripciones", 3))
        .unwrap();
    db.set_recurring_active(user, netflix.id, false).unwrap();

    assert_eq!(db.generate_recurring(user, "2026-01").unwrap(), 0);

    db.set_recurring_active(user, netflix.id, true).unwrap();
    assert_eq!(db.generate_recurring(user, "2026-01").unwrap(), 1);
}

#[test]
fn test_generate_recurring_invalid_month() {
    let (db, user) = setup();
    db.create_recurring(user, &monthly("Nómina", 20000.0, "Ingreso", 15))
        .unwrap();
    assert!(matches!(
        db.generate_recurring(user, "2026-1"),
        Err(Error::InvalidData(_))
    ));
}

#[test]
fn test_generate_recurring_signed_month_creates_nothing() {
    let (db, user) = setup();
    db.create_recurring(user, &monthly("Renta", -8000.0, "Renta/Hipoteca", 1))
        .unwrap();

    for _ in 0..2 {
        assert!(matches!(
            db.generate_recurring(user, "2026-+1"),
            Err(Error::InvalidData(_))
        ));
    }
    assert!(db
        .list_records(user, "2026-01", RecordKind::All)
        .unwrap()
        .is_empty());

    assert_eq!(db.generate_recurring(user, "2026-01").unwrap(), 1);
    assert_eq!(db.generate_recurring(user, "2026-01").unwrap(), 0);
}

#[test]
fn test_set_recurring_active_other_user() {
    let (db, user) = setup();
    let other = db.register_user("beto@example.com").unwrap();
    let template = db
        .create_recurring(user, &monthly("Gym", -500.0, "Salud", 5))
        .unwrap();
    assert!(matches!(
        db.set_recurring_active(other, template.id, false),
        Err(Error::NotFound(_))
    ));
}

// ========== Reports ==========

#[test]
fn test_monthly_report() {
    let (db, user) = setup();
    db.add_records(
        user,
        &[
            new_record("2026-01-15", "NOMINA", 1000.0),
            new_record("2026-01-20", "WALMART", -400.0),
            new_record("2026-02-01", "WALMART", -999.0),
        ],
        &Classifier::default(),
    )
    .unwrap();

    let report = db.monthly_report(user, "2026-01").unwrap();
    assert_eq!(report.summary.income, 1000.0);
    assert_eq!(report.summary.expense, 400.0);
    assert_eq!(report.summary.net, 600.0);
    assert_eq!(report.summary.status, Status::Green);
    assert_eq!(report.summary.count_records, 2);
    assert_eq!(report.summary.top_spend[0].category, "Super");
    assert!(report.message.starts_with("Buen mes. Cerraste con 600.00 neto."));
}

#[test]
fn test_month_transactions_projects_records() {
    let (db, user) = setup();
    db.add_records(
        user,
        &[
            new_record("2026-01-02", "UBER", -50.0),
            new_record("2026-02-02", "UBER", -60.0),
        ],
        &Classifier::default(),
    )
    .unwrap();

    let txs = db.month_transactions(user, "2026-01").unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].description, "UBER");
    assert_eq!(txs[0].category, "Transporte");
    assert_eq!(txs[0].confidence, 0.85);
}

#[test]
fn test_monthly_report_empty() {
    let (db, user) = setup();
    let report = db.monthly_report(user, "2026-01").unwrap();
    assert_eq!(report.summary.status, Status::Yellow);
    assert_eq!(report.summary.count_records, 0);
}
