use super::{CostCodeImportData, CostCodeImportResponse, ImportCategoryResult};

fn describe(result: &ImportCategoryResult, noun: &str) -> String {
    format!(
        "{} {} ({} new, {} duplicates, {} errors)",
        result.total,
        noun,
        result.new_count,
        result.duplicates,
        result.errors.len()
    )
}

/// Builds the response for a completed import. `success` reports that the
/// batch was processed; row failures are listed per category.
pub fn summarize(data: CostCodeImportData) -> CostCodeImportResponse {
    let message = format!(
        "Import completed: {}; {}",
        describe(&data.divisions, "divisions"),
        describe(&data.configurations, "cost codes")
    );
    CostCodeImportResponse {
        success: true,
        message,
        data,
    }
}
