use anyhow::Context;

use profdash_report::config::ReportConfig;
use profdash_report::{charts, pdf, stats};
use profdash_store::{DocumentStore, PgDocumentStore};
use printpdf::image_crate;

/// The whole job is linear; a current-thread runtime is all the storage
/// client needs.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    profdash_observability::init();

    let config = ReportConfig::load();

    // A storage outage aborts the job before any artifact is written.
    let store = PgDocumentStore::connect(&config.database_url)
        .await
        .context("failed to connect to the document store")?;
    println!("Connected to the document store.");

    let records = store
        .list()
        .await
        .context("failed to load professor records")?;
    println!("Loaded {} professor records.", records.len());

    let summary = stats::summarize(&records)?;

    println!("\nProfessor count by department:");
    for dc in &summary.departments {
        println!("  {}: {}", dc.department, dc.count);
    }
    println!("\nName length statistics:");
    for (label, value) in summary.name_stats.rows() {
        println!("  {label}: {value:.2}");
    }

    let bar_path = config.output_dir.join("department_counts.png");
    let hist_path = config.output_dir.join("name_length_distribution.png");
    charts::render_department_chart(&summary.departments, &bar_path)?;
    charts::render_name_length_chart(&summary.name_lengths, &hist_path)?;
    println!(
        "\nCharts saved: {} {}",
        bar_path.display(),
        hist_path.display()
    );

    let bar_chart = image_crate::open(&bar_path)
        .with_context(|| format!("failed to read back {}", bar_path.display()))?;
    let hist_chart = image_crate::open(&hist_path)
        .with_context(|| format!("failed to read back {}", hist_path.display()))?;

    let pdf_path = config.output_dir.join("Professor_Data_Analysis_Report.pdf");
    let doc = pdf::compose_report(&summary, &bar_chart, &hist_chart)?;
    pdf::save_report(doc, &pdf_path)?;
    println!("PDF report generated: {}", pdf_path.display());

    Ok(())
}
