use qnet_core::{QueueReport, ReplicationSummary, SimulationReport};
use std::fmt::{self, Write};

const RULE: &str = "=========================================================";
const STARS: &str = "*********************************************************";

pub fn render_text(report: &SimulationReport) -> String {
    render_with(report, write_report)
}

pub fn render_summary(summary: &ReplicationSummary) -> String {
    render_with(summary, write_summary)
}

/// `fmt::Write` for `String` never returns an error, so the result is dropped here only.
fn render_with<T>(value: &T, write: fn(&mut String, &T) -> fmt::Result) -> String {
    let mut out = String::new();
    let _ = write(&mut out, value);
    out
}

fn write_report(out: &mut String, report: &SimulationReport) -> fmt::Result {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "=================    END OF SIMULATION   ================")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "======================    REPORT   ======================")?;
    writeln!(out, "{}", RULE)?;

    for queue in &report.queues {
        write_queue(out, queue, report.final_time)?;
    }

    writeln!(out, "{}", RULE)?;
    writeln!(out, "Simulation time:     {:.4}", report.final_time)?;
    writeln!(out, "Random draws used:   {}", report.draws)?;
    writeln!(out, "Events processed:    {}", report.events_processed)?;
    if let Some(reason) = report.stop_reason {
        writeln!(out, "Stopped by:          {:?}", reason)?;
    }
    writeln!(out, "External arrivals:   {}", report.total_external_arrivals)?;
    writeln!(out, "Admissions:          {}", report.total_admitted)?;
    writeln!(out, "Losses:              {}", report.total_lost)?;
    writeln!(out, "Completed:           {}", report.total_completed)?;
    writeln!(out, "{}", RULE)?;
    Ok(())
}

fn write_queue(out: &mut String, queue: &QueueReport, total_time: f64) -> fmt::Result {
    writeln!(out, "{}", STARS)?;
    writeln!(out, "Queue:   {} ({})", queue.name, queue.kendall)?;
    if let Some(arrival) = queue.arrival {
        writeln!(out, "Arrival: {:.1} ... {:.1}", arrival.min, arrival.max)?;
    }
    writeln!(out, "Service: {:.1} ... {:.1}", queue.service.min, queue.service.max)?;
    writeln!(out, "{}", STARS)?;
    writeln!(out, "   State               Time               Probability")?;
    for (state, time) in queue.occupancy_times.iter().enumerate() {
        let probability = if total_time > 0.0 {
            time / total_time * 100.0
        } else {
            0.0
        };
        writeln!(
            out,
            "{:>8}           {:>10.4}                {:>6.2}%",
            state, time, probability
        )?;
    }
    writeln!(out, "Number of losses: {}", queue.lost)?;
    writeln!(out, "{}", STARS)?;
    writeln!(out, "Performance Metrics:")?;
    writeln!(out, "Admitted / served:   {} / {}", queue.admitted, queue.served)?;
    writeln!(out, "Utilization:         {:.2}%", queue.utilization * 100.0)?;
    writeln!(out, "Server utilization:  {:.2}%", queue.server_utilization * 100.0)?;
    writeln!(out, "Mean population:     {:.4}", queue.mean_occupancy)?;
    writeln!(out, "Mean waiting line:   {:.4}", queue.mean_waiting)?;
    writeln!(out, "Throughput:          {:.4}", queue.throughput)?;
    writeln!(out, "Mean response time:  {:.4}", queue.mean_response_time)
}

fn write_summary(out: &mut String, summary: &ReplicationSummary) -> fmt::Result {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Replications: {}", summary.replications)?;
    writeln!(
        out,
        "Simulation time:  {:.4} (sd {:.4})",
        summary.final_time.mean, summary.final_time.std_dev
    )?;
    writeln!(
        out,
        "Completed:        {:.1} (sd {:.1})",
        summary.total_completed.mean, summary.total_completed.std_dev
    )?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Queue       Mean population        Utilization            Losses")?;
    for q in &summary.queues {
        writeln!(
            out,
            "{:<8} {:>9.4} ±{:<8.4} {:>8.2}% ±{:<6.2} {:>10.1} ±{:.1}",
            q.name,
            q.mean_occupancy.mean,
            q.mean_occupancy.std_dev,
            q.utilization.mean * 100.0,
            q.utilization.std_dev * 100.0,
            q.lost.mean,
            q.lost.std_dev
        )?;
    }
    writeln!(out, "{}", RULE)?;
    Ok(())
}
