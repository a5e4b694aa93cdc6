//! Subcommand implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use stockbook_client::{ClientConfig, HttpBackend, VoucherForm};
use stockbook_core::pricing::price_line;
use stockbook_core::validation::validate_voucher;
use stockbook_core::{LineItem, LinePricing, Money, Percent, PricingRules, Quantity, VoucherDraft};
use tracing::{debug, info};

use crate::PriceArgs;

pub fn price(args: &PriceArgs, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let rules = args.stages.unwrap_or_else(|| PricingRules::for_kind(args.kind));
    let line = line_from_args(args);
    debug!(?rules, ?line, "Pricing line");

    let priced = price_line(&line, rules);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&priced)?);
        return Ok(());
    }

    let config = ClientConfig::load(config_path)?;
    print_breakdown(&config, &priced, rules);
    Ok(())
}

fn line_from_args(args: &PriceArgs) -> LineItem {
    let quantity = if args.dozens.is_some() || args.pieces.is_some() {
        Quantity::dozens_pieces(args.dozens.unwrap_or_default(), args.pieces.unwrap_or_default())
    } else {
        Quantity::units(args.qty)
    };

    LineItem::new(Money::new(args.rate), quantity)
        .with_gst(Percent::new(args.gst))
        .with_discount(Money::new(args.discount), Percent::new(args.discount_percent))
        .with_extra_discount(Percent::new(args.extra_discount_percent))
}

fn print_breakdown(config: &ClientConfig, priced: &LinePricing, rules: PricingRules) {
    let fmt = |m: Money| config.format_currency(m);

    println!("{:<16}{:>14}", "Units", priced.units.normalize());
    println!("{:<16}{:>14}", "Subtotal", fmt(priced.subtotal));
    if rules.has_discount {
        println!("{:<16}{:>14}", "Discount", fmt(priced.discount));
    }
    if rules.has_extra_discount {
        println!("{:<16}{:>14}", "Extra discount", fmt(priced.extra_discount));
    }
    if rules.has_gst {
        println!("{:<16}{:>14}", "GST", fmt(priced.gst));
    }
    println!("{:<16}{:>14}", "Total", fmt(priced.total));

    if priced.negative_clamped {
        println!("note: discounts exceed the amount; total shown as zero");
    }
    if priced.overflow {
        println!("note: amounts too large to compute; total shown as zero");
    }
}

pub fn totals(path: &Path, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let draft = read_draft(path)?;
    let config = ClientConfig::load(config_path)?;
    let fmt = |m: Money| config.format_currency(m);

    println!(
        "{} voucher, {} rules: {:?}",
        draft.kind,
        if draft.pricing.is_some() { "custom" } else { "default" },
        draft.rules()
    );
    println!(
        "{:>3}  {:<24}{:>10}{:>14}{:>16}",
        "#", "Description", "Qty", "Rate", "Total"
    );

    for (index, (entry, priced)) in draft.priced_entries().enumerate() {
        let marker = if entry.is_active() { "" } else { "  (void)" };
        println!(
            "{:>3}  {:<24}{:>10}{:>14}{:>16}{}",
            index + 1,
            truncate(&entry.description, 22),
            priced.units.normalize(),
            fmt(entry.line.rate),
            fmt(priced.total),
            marker
        );
    }

    let totals = draft.totals();
    println!();
    println!("{:<16}{:>16}", "Lines", format!("{}/{}", totals.active_count, totals.entry_count));
    println!("{:<16}{:>16}", "Units", totals.total_units.normalize());
    println!("{:<16}{:>16}", "Subtotal", fmt(totals.subtotal));
    println!("{:<16}{:>16}", "Discount", fmt(totals.discount));
    println!("{:<16}{:>16}", "GST", fmt(totals.gst));
    println!("{:<16}{:>16}", "Grand total", fmt(totals.grand_total));
    if totals.overflow {
        println!("note: totals too large to compute; shown as zero");
    }
    Ok(())
}

pub fn validate(path: &Path) -> anyhow::Result<()> {
    let draft = read_draft(path)?;
    validate_voucher(&draft)?;
    println!("OK: {} voucher with {} line(s)", draft.kind, draft.len());
    Ok(())
}

pub async fn submit(path: &Path, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let draft = read_draft(path)?;
    let config = ClientConfig::load(config_path)?;
    let ctx = config.request_context()?;
    let backend = Arc::new(HttpBackend::new(&config)?);
    info!(?ctx, kind = %draft.kind, "Submitting voucher");

    let form = VoucherForm::with_draft_state(backend, ctx, draft);
    let saved = form.save().await?;

    match saved.number {
        Some(number) => println!("Saved voucher {} ({})", saved.id, number),
        None => println!("Saved voucher {}", saved.id),
    }
    Ok(())
}

fn read_draft(path: &Path) -> anyhow::Result<VoucherDraft> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a valid voucher file", path.display()))
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
