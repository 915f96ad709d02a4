use crate::types::report::Evaluation;
use crate::types::signals::ClientSignals;

const SIGNAL_COUNT: usize = 5;

pub fn to_markdown(evaluations: &[Evaluation]) -> String {
    let mut output = String::new();
    output.push_str("# Client Score Report\n\n");
    if evaluations.is_empty() {
        output.push_str("- no sources scored\n");
        return output;
    }

    for evaluation in evaluations {
        output.push_str(&format!("## {}\n\n", evaluation.source));
        output.push_str(&format!(
            "Score: {} ({})\n\n",
            evaluation.score, evaluation.tier
        ));
        output.push_str(&format!(
            "Scored at: {}\n\n",
            evaluation.scored_at.to_rfc3339()
        ));
        if evaluation.degraded {
            output.push_str(&format!(
                "Degraded: base score {} minus penalty {}\n\n",
                evaluation.base_score, evaluation.penalty
            ));
        }
        if let Some(note) = &evaluation.note {
            output.push_str(&format!("> {note}\n\n"));
        }

        output.push_str("### Breakdown\n\n");
        for (name, term) in evaluation.breakdown.terms() {
            match term {
                Some(points) => output.push_str(&format!("- {name}: {points:.1}\n")),
                None => output.push_str(&format!("- {name}: excluded\n")),
            }
        }
        output.push('\n');

        output.push_str(&format!(
            "### Signals ({} of {SIGNAL_COUNT} found)\n\n",
            evaluation.signals.present_count()
        ));
        push_signals(&mut output, &evaluation.signals);
        output.push('\n');
    }

    output
}

fn push_signals(output: &mut String, signals: &ClientSignals) {
    if signals.is_empty() {
        output.push_str("- none\n");
        return;
    }
    let unknown = || "unknown".to_string();
    output.push_str(&format!(
        "- hire rate: {}\n",
        signals
            .hiring_rate
            .map(|rate| format!("{rate}%"))
            .unwrap_or_else(unknown)
    ));
    output.push_str(&format!(
        "- payment verified: {}\n",
        signals
            .payment_verified
            .map(|verified| if verified { "yes" } else { "no" }.to_string())
            .unwrap_or_else(unknown)
    ));
    output.push_str(&format!(
        "- last seen: {}\n",
        signals.last_seen.clone().unwrap_or_else(unknown)
    ));
    output.push_str(&format!(
        "- jobs posted: {}\n",
        signals
            .total_jobs
            .map(|jobs| jobs.to_string())
            .unwrap_or_else(unknown)
    ));
    output.push_str(&format!(
        "- total spent: {}\n",
        signals
            .total_spending
            .map(|spent| format!("${spent:.0}"))
            .unwrap_or_else(unknown)
    ));
}
