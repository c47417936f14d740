use rapport_core::dto::RunReportDto;

/// Outcome of one generator batch. A returned report means the batch
/// completed (possibly early on budget expiry); a failed candidate-list
/// read surfaces as an error instead, so callers can tell "nothing
/// eligible" apart from "nothing attempted".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub created: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunReport {
    pub fn summary(&self, job: &str) -> String {
        format!(
            "{job}: created {} action(s), {} failed, {} skipped",
            self.created, self.failed, self.skipped
        )
    }

    pub fn to_dto(&self, job: &str) -> RunReportDto {
        RunReportDto {
            success: true,
            created: self.created,
            failed: self.failed,
            skipped: self.skipped,
            message: self.summary(job),
        }
    }
}
