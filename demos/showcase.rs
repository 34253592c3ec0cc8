//! Walks through both builders and the analyzer on the console.
//!
//! Run with: `cargo run --example showcase`

use anyhow::Result;
use queryforge::{
    analyze_relational, analyze_search, Comparison, HighlightSpec, QueryBuilder, QueryPredicate,
    QueryReport, RangeBounds, SearchQueryBuilder,
};

fn main() -> Result<()> {
    // Setup logging
    tracing_subscriber::fmt::init();

    relational_showcase()?;
    search_showcase()?;

    Ok(())
}

fn relational_showcase() -> Result<()> {
    println!("=== Relational queries ===\n");

    let report_query = QueryBuilder::new()
        .select(["u.name", "COUNT(o.id) AS order_count"])
        .from("users u")?
        .left_join("orders o", "o.user_id = u.id")?
        .where_("u.created_at", Comparison::Gt, "2026-01-01")
        .where_in("u.country", ["DE", "FR", "NL"])
        .or_where_eq("u.vip", true)
        .group_by(["u.name"])
        .having("COUNT(o.id)", Comparison::GtEq, 3)
        .order_by_desc("order_count")
        .limit(20)?
        .build()?;

    println!("SQL:        {}", report_query.text);
    println!("parameters: {:?}", report_query.parameters);
    println!("cost:       {}", report_query.estimated_cost);
    print_report(analyze_relational(&report_query));

    // The same base can branch into variants without copies interfering.
    let base = QueryBuilder::new()
        .select(["*"])
        .from("audit_log")?
        .where_eq("tenant", "acme");
    let recent = base.clone().order_by_desc("at").limit(50)?.build()?;
    let failures = base.where_eq("level", "error").build()?;
    let purge = QueryBuilder::new()
        .delete_from("audit_log")?
        .where_("at", Comparison::Lt, "2025-01-01")
        .build()?;

    println!("SQL:        {}", recent.text);
    print_report(analyze_relational(&recent));
    println!("SQL:        {}", failures.text);
    print_report(analyze_relational(&failures));
    println!("SQL:        {}", purge.text);
    print_report(analyze_relational(&purge));

    let signup = QueryBuilder::new()
        .insert_into("users")?
        .set("name", "Ada Lovelace")
        .set("email", "ada@example.com")
        .set("vip", true)
        .build()?;
    println!("SQL:        {}", signup.text);
    println!("parameters: {:?}\n", signup.parameters);

    Ok(())
}

fn search_showcase() -> Result<()> {
    println!("=== Search queries ===\n");

    let catalog = SearchQueryBuilder::new()
        .index("products")?
        .multi_match("wireless headphones", ["name", "description"])
        .filter("in_stock", true)
        .filter("category", vec!["audio", "accessories"])
        .filter_range("price", RangeBounds::new().gte(20).lte(250))
        .sort_desc("rating")
        .size(24)?
        .from(0)?
        .source(["id", "name", "price", "rating"])
        .terms_aggregation("by_brand", "brand", 10)
        .avg_aggregation("avg_price", "price")
        .highlight(HighlightSpec::new(["name", "description"]).fragment_size(120))
        .build();

    println!("body: {}", serde_json::to_string_pretty(&catalog.to_document())?);
    print_report(analyze_search(&catalog));

    let moderation = SearchQueryBuilder::new()
        .index("articles")?
        .bool_query()
        .must(QueryPredicate::match_("body", "security advisory"))
        .must_not(QueryPredicate::term("status", "retracted"))
        .should(QueryPredicate::term("pinned", true))
        .done()
        .size(2000)?
        .build();

    println!(
        "body: {}",
        serde_json::to_string_pretty(&moderation.to_document())?
    );
    print_report(analyze_search(&moderation));

    Ok(())
}

fn print_report(report: QueryReport) {
    println!("rating:     {}", report.rating);
    for note in &report.notes {
        println!("  note: {}", note);
    }
    println!();
}
