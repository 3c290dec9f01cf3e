//! Payment Voucher Demo
//!
//! Fills a payment voucher with stored defaults and two expenditure lines,
//! saves its JSON next to the PDF and writes the printable voucher.
//!
//! Usage:
//!   cargo run --example render_voucher -- [output-dir]

use anyhow::{anyhow, Context};
use std::path::PathBuf;
use voucher::{
    AppConfig, FileGateway, FixedClock, MemoryStore, Screen, VoucherApp, VoucherType,
};

fn main() -> anyhow::Result<()> {
    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("output"));
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create '{}'", output_dir.display()))?;

    let clock = FixedClock::at_date(2026, 10, 19).ok_or_else(|| anyhow!("invalid demo date"))?;
    let config = AppConfig::with_dir(&output_dir);
    let gateway = FileGateway::new(output_dir.clone()).with_clock(clock);
    let mut app = VoucherApp::new(config, Box::new(MemoryStore::new()), Box::new(gateway))
        .with_clock(clock);

    app.show(Screen::Defaults);
    app.save_defaults([
        ("sltbSection", "IT Section"),
        ("preparedBy", "K. Perera"),
        ("checkedBy", "S. Fernando"),
        ("ssclVat", "2.5"),
        ("vat", "8"),
    ])?;

    app.select_voucher(VoucherType::Payment);
    app.set_field("payableTo", "Lanka Office Supplies (Pvt) Ltd")?;
    app.set_field("fileReference", "SLTB/IT/2026/118")?;

    app.set_row_field(1, "desc", "Printer toner cartridges")?;
    app.set_row_field(1, "rate", "750")?;
    app.set_row_field(1, "units", "2")?;

    let second = app.add_row()?;
    app.set_row_field(second, "desc", "A4 paper (ream)")?;
    app.set_row_field(second, "rate", "500")?;
    let totals = app.set_row_field(second, "units", "1")?;

    app.set_checkbox("doc-invoice", true)?;
    let number = app.generate_voucher_number()?;
    println!("Voucher {number}: total Rs. {:.2}", totals.total);

    let saved = app.save_voucher();
    match (saved.success, saved.path, saved.error) {
        (true, Some(path), _) => println!("Saved: {path}"),
        (_, _, error) => eprintln!("Save failed: {}", error.unwrap_or_default()),
    }

    let (file_name, bytes) = app.render_pdf()?;
    let pdf_path = output_dir.join(file_name);
    std::fs::write(&pdf_path, bytes)?;
    println!("Generated: {}", pdf_path.display());

    Ok(())
}
