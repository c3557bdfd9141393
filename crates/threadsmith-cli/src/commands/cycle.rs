//! Cycle command implementation.

use super::{load_template, render_all, synthesizer_config};
use crate::cli::CycleArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use threadsmith_domain::traits::LlmProvider;
use threadsmith_domain::{cycle_combinations, flatten, Column, Combination, CYCLED_CATEGORY_KEY};
use threadsmith_store::{read_prompt_categories, write_csv, write_questions, QuestionLayout};
use threadsmith_synthesizer::{PromptTemplate, SynthesisReport, Synthesizer};
use tracing::info;

fn plan(args: &CycleArgs, config: &Config) -> Result<(Vec<Combination>, PromptTemplate)> {
    let categories = read_prompt_categories(&args.categories)?;
    let count = args.count.unwrap_or(config.synthesizer.default_target_count);
    let combinations = cycle_combinations(&categories, count);
    info!("Cycling {} categories into {} questions", categories.len(), combinations.len());

    let template = load_template(args.template.as_deref(), PromptTemplate::category_default())?;
    template.check_keys(&[CYCLED_CATEGORY_KEY])?;
    Ok((combinations, template))
}

/// Print the prompts a cycle run would send.
pub fn preview_cycle(args: &CycleArgs, config: &Config, formatter: &Formatter) -> Result<Vec<String>> {
    let (combinations, template) = plan(args, config)?;
    let prompts = render_all(&template, &combinations, &config.synthesizer);
    println!("{}", formatter.prompts(&prompts)?);
    Ok(prompts)
}

/// Execute the cycle command.
pub async fn execute_cycle<L>(args: CycleArgs, config: &Config, llm: L, formatter: &Formatter) -> Result<SynthesisReport>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    let (combinations, template) = plan(&args, config)?;
    let total = combinations.len();

    let synthesizer = Synthesizer::new(llm, template, synthesizer_config(config, args.concurrency))?;
    let report = synthesizer.synthesize_all(combinations).await;

    write_questions(&args.output, &report.batch, QuestionLayout::CategoryInfo)?;
    if let Some(csv) = &args.csv {
        let table = flatten(&report.batch, &Column::category_schema());
        write_csv(csv, &table)?;
        formatter.status(formatter.info(&format!("Wrote {} rows to {}", table.len(), csv.display())));
    }

    println!("{}", formatter.synthesis_summary(&report, Some(total))?);
    formatter.status(formatter.success(&format!(
        "Wrote {} questions to {}",
        report.generated(),
        args.output.display()
    )));
    Ok(report)
}
