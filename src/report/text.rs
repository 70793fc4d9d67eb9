//! Human-readable report rendering.

use crate::pipeline::Recommendation;

use super::record::AdviceRecord;

const RULE_WIDTH: usize = 60;

fn format_time(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) => format!("{s:.2}s"),
        None => "N/A".to_string(),
    }
}

fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

/// Render a multi-line report for terminal output.
pub fn render_text(record: &AdviceRecord) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let rec = &record.recommendation;
    let mut out = String::new();

    push_line(&mut out, &rule);
    push_line(&mut out, &format!("Thread Advisor Report: {}", record.name));
    push_line(&mut out, &rule);
    push_line(&mut out, "");

    push_line(&mut out, &format!("Timing Metrics ({} timer):", record.timer));
    push_line(&mut out, &format!("  Wall Time:    {}", format_time(Some(record.wall_s))));
    push_line(&mut out, &format!("  CPU Time:     {}", format_time(Some(record.cpu_s))));
    push_line(&mut out, &format!("  I/O Time:     {}", format_time(Some(record.io_s))));
    if record.stall_s.is_some() {
        push_line(&mut out, &format!("  Stall Time:   {}", format_time(record.stall_s)));
    }
    push_line(&mut out, &format!("  I/O Ratio:    {}", format_percent(rec.io_ratio)));
    push_line(&mut out, "");

    out.push_str(&render_recommendation(rec));
    push_line(&mut out, "");
    out.push_str(&rule);

    out
}

/// Render the decision part of a report: history, curve, and decision factors.
pub fn render_recommendation(rec: &Recommendation) -> String {
    let reasons = &rec.reasons;
    let mut out = String::new();

    if let Some(history) = rec.history.as_ref().filter(|h| h.is_blended()) {
        push_line(&mut out, "History:");
        if let Some(samples) = history.history_samples {
            push_line(&mut out, &format!("  Samples:       {samples}"));
        }
        if let Some(weight) = history.history_weight {
            push_line(&mut out, &format!("  Weight:        {weight:.2}"));
        }
        push_line(&mut out, &format!("  Blended I/O:   {}", format_percent(history.io_ratio)));
        if let Some(stall) = history.stall_ms {
            push_line(&mut out, &format!("  Blended Stall: {stall:.2} ms"));
        }
        push_line(&mut out, "");
    }

    push_line(&mut out, "Speedup Curve (Amdahl's Law):");
    for point in &rec.speedup_curve {
        push_line(
            &mut out,
            &format!("  {} threads -> {:.2}x speedup", point.threads, point.speedup),
        );
    }
    push_line(&mut out, "");

    push_line(&mut out, &format!("RECOMMENDED THREADS: {}", rec.recommended_threads));
    push_line(&mut out, "");

    push_line(&mut out, "Decision Factors:");
    push_line(
        &mut out,
        &format!(
            "  Threshold:         {}",
            format_percent(reasons.diminishing_return_threshold)
        ),
    );
    if let Some(pool) = reasons.pool_cap {
        push_line(&mut out, &format!("  Pool Cap:          {pool}"));
    }
    push_line(&mut out, &format!("  CPU Core Cap:      {}", reasons.cpu_cap));
    push_line(&mut out, &format!("  Hard Cap:          {}", reasons.hard_cap));
    if let Some(env) = reasons.env_cap {
        push_line(&mut out, &format!("  Env Cap:           {env}"));
    }
    push_line(&mut out, &format!("  Effective Cap:     {}", reasons.effective_cap));
    push_line(&mut out, &format!("  Greedy Threads:    {}", reasons.greedy_threads));
    if let Some(stall) = reasons.stall_ms {
        push_line(&mut out, &format!("  Stall (avg):       {stall:.2} ms"));
    }
    if let Some(limit) = reasons.stall_limit_ms {
        push_line(&mut out, &format!("  Stall (limit):     {limit:.2} ms"));
    }
    if reasons.stall_penalty_applied {
        push_line(&mut out, "  Stall Penalty:     -1 thread");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_line_terminates() {
        let mut out = String::new();
        push_line(&mut out, "a");
        push_line(&mut out, "");
        assert_eq!(out, "a\n\n");
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_time(Some(1.234)), "1.23s");
        assert_eq!(format_time(None), "N/A");
        assert_eq!(format_percent(0.25), "25.0%");
    }
}
