use assert_cmd::Command;
use predicates::prelude::*;

fn extrato() -> Command {
    Command::cargo_bin("extrato").unwrap()
}

#[test]
fn formats_lists_the_catalog() {
    extrato()
        .arg("formats")
        .assert()
        .success()
        .stdout(predicate::str::contains("nubank"))
        .stdout(predicate::str::contains("Generic CSV"));
}

#[test]
fn preview_parses_without_storing() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("extrato-itau.csv");
    std::fs::write(&file, "04/03/2024;PIX MERCADO;-250,00\n05/03/2024;TED;1.200,00\n").unwrap();

    extrato()
        .arg("preview")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ita\u{fa}"))
        .stdout(predicate::str::contains("2024-03-04"))
        .stdout(predicate::str::contains("2 transaction(s) parsed"));
}

#[test]
fn preview_reports_skipped_rows() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("nubank-marco.csv");
    std::fs::write(
        &file,
        "Data,Valor,Identificador,Descri\u{e7}\u{e3}o\n05/03/2024,-27.90,a1,iFood\nnot a date,9.99,a2,lixo\n",
    )
    .unwrap();

    extrato()
        .arg("preview")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 transaction(s) parsed"))
        .stdout(predicate::str::contains("1 row(s) skipped"))
        .stdout(predicate::str::contains("line 3"));
}

#[test]
fn preview_empty_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("empty.csv");
    std::fs::write(&file, "").unwrap();

    extrato()
        .arg("preview")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty"));
}

#[test]
fn preview_unknown_format_key_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("x.csv");
    std::fs::write(&file, "01/03/2024,caf\u{e9},-8.50\n").unwrap();

    extrato()
        .arg("preview")
        .arg(&file)
        .arg("--format")
        .arg("acme_bank")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown format"));
}
