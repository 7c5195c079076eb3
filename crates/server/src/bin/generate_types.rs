//! Run with: cargo run --package server --bin generate-types --features typescript

use std::fs;
use std::path::Path;

fn main() {
    println!("Generating TypeScript types...");

    let out_dir = Path::new("frontend/src/types/generated");

    if let Err(e) = fs::create_dir_all(out_dir) {
        eprintln!("Failed to create output directory: {}", e);
        std::process::exit(1);
    }

    #[cfg(feature = "typescript")]
    {
        use ts_rs::TS;

        pm_core::Requirement::export_all_to(out_dir).expect("Failed to export Requirement");
        pm_core::RequirementDetails::export_all_to(out_dir)
            .expect("Failed to export RequirementDetails");
        pm_core::CreateRequirementRequest::export_all_to(out_dir)
            .expect("Failed to export CreateRequirementRequest");
        pm_core::UpdateStatusRequest::export_all_to(out_dir)
            .expect("Failed to export UpdateStatusRequest");
        pm_core::PriorityAssignment::export_all_to(out_dir)
            .expect("Failed to export PriorityAssignment");
        pm_core::MetricsInput::export_all_to(out_dir).expect("Failed to export MetricsInput");
        pm_core::PortfolioSummary::export_all_to(out_dir)
            .expect("Failed to export PortfolioSummary");
        pm_core::SummaryFilter::export_all_to(out_dir).expect("Failed to export SummaryFilter");
        pm_core::Prd::export_all_to(out_dir).expect("Failed to export Prd");
        pm_core::TestCase::export_all_to(out_dir).expect("Failed to export TestCase");

        drafting::ProviderInfo::export_all_to(out_dir).expect("Failed to export ProviderInfo");

        server::routes::prd::GenerateRequest::export_all_to(out_dir)
            .expect("Failed to export GenerateRequest");
        server::routes::requirements::PrioritizeRequest::export_all_to(out_dir)
            .expect("Failed to export PrioritizeRequest");
        server::routes::requirements::PrioritizeResponse::export_all_to(out_dir)
            .expect("Failed to export PrioritizeResponse");

        println!("Types exported to {}", out_dir.display());

        generate_index(out_dir);
    }

    #[cfg(not(feature = "typescript"))]
    {
        eprintln!("Error: typescript feature is not enabled");
        eprintln!("Run with: cargo run --package server --bin generate-types --features typescript");
        std::process::exit(1);
    }
}

/// Write an `index.ts` re-exporting every generated file in `out_dir`.
#[cfg(feature = "typescript")]
fn generate_index(out_dir: &Path) {
    let mut modules: Vec<String> = fs::read_dir(out_dir)
        .expect("Failed to read output directory")
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            name.strip_suffix(".ts")
                .filter(|stem| *stem != "index")
                .map(str::to_string)
        })
        .collect();
    modules.sort();

    let mut exports = String::from(
        "// Auto-generated - regenerate with: cargo run --package server --bin generate-types --features typescript\n\n",
    );
    for module in modules {
        exports.push_str(&format!("export * from './{}';\n", module));
    }

    let index_path = out_dir.join("index.ts");
    fs::write(&index_path, exports).expect("Failed to write index.ts");

    println!("Generated {}", index_path.display());
}
