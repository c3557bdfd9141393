//! Generate command implementation.

use super::{load_template, render_all, synthesizer_config};
use crate::cli::GenerateArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use threadsmith_domain::traits::LlmProvider;
use threadsmith_domain::{combination_count, flatten, iter_combinations, Column, Combination};
use threadsmith_store::{apply_key_aliases, read_dimensions, write_csv, write_questions, QuestionLayout};
use threadsmith_synthesizer::{PromptTemplate, SynthesisReport, Synthesizer};
use tracing::{info, warn};

/// Everything a generate run needs before the first call
struct Plan {
    keys: Vec<String>,
    combinations: Vec<Combination>,
    /// Size of the full product, `None` if it overflows
    total: Option<usize>,
    template: PromptTemplate,
}

fn plan(args: &GenerateArgs, config: &Config) -> Result<Plan> {
    let mut categories = read_dimensions(&args.dimensions)?;
    apply_key_aliases(&mut categories, &config.categories);
    let keys: Vec<String> = categories.iter().map(|c| c.key.clone()).collect();

    let total = combination_count(&categories);
    match total {
        Some(total) => info!("{} categories give {} combinations", categories.len(), total),
        None => warn!("{} categories give more combinations than can be counted", categories.len()),
    }

    let combinations: Vec<Combination> = match (args.limit, total) {
        (Some(limit), _) => iter_combinations(&categories).take(limit).collect(),
        (None, Some(_)) => iter_combinations(&categories).collect(),
        (None, None) => {
            return Err(CliError::InvalidInput(format!(
                "{} has too many combinations to generate; pass --limit",
                args.dimensions.display()
            )))
        }
    };

    let template = load_template(args.template.as_deref(), PromptTemplate::combination_default())?;
    template.check_keys(&keys)?;

    Ok(Plan {
        keys,
        combinations,
        total,
        template,
    })
}

/// Print the prompts a generate run would send.
pub fn preview_generate(args: &GenerateArgs, config: &Config, formatter: &Formatter) -> Result<Vec<String>> {
    let plan = plan(args, config)?;
    let prompts = render_all(&plan.template, &plan.combinations, &config.synthesizer);
    println!("{}", formatter.prompts(&prompts)?);
    Ok(prompts)
}

/// Execute the generate command.
pub async fn execute_generate<L>(
    args: GenerateArgs,
    config: &Config,
    llm: L,
    formatter: &Formatter,
) -> Result<SynthesisReport>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    let plan = plan(&args, config)?;
    if plan.combinations.is_empty() {
        warn!("No combinations to generate; a category in {} has no dimensions", args.dimensions.display());
    }

    let synthesizer = Synthesizer::new(llm, plan.template, synthesizer_config(config, args.concurrency))?;
    let report = synthesizer.synthesize_all(plan.combinations).await;

    write_questions(&args.output, &report.batch, QuestionLayout::Dimensions)?;
    if let Some(csv) = &args.csv {
        let table = flatten(&report.batch, &Column::dimension_schema(&plan.keys));
        write_csv(csv, &table)?;
        formatter.status(formatter.info(&format!("Wrote {} rows to {}", table.len(), csv.display())));
    }

    println!("{}", formatter.synthesis_summary(&report, plan.total)?);
    formatter.status(formatter.success(&format!(
        "Wrote {} questions to {}",
        report.generated(),
        args.output.display()
    )));
    Ok(report)
}
