use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tracing::{error, info_span, warn};

use geoclima_cli::session::{
    ApplyRequest, bucket, parse_date, period_rows, plan_apply, read_actions, read_layers,
    read_plugins, replay, select_picker,
};
use geoclima_config::{check_period_table, default_bounds, load_available_dates};
use geoclima_core::validate_date_range;
use geoclima_model::{AvailableDateBounds, DateFormat, PeriodKey, RangeErrorKind};

use crate::cli::{ApplyArgs, BucketArgs, PeriodsArgs, ReplayArgs, ValidateArgs};
use crate::summary::{print_bucket, print_periods, print_plan, print_replay, print_validation};

fn reference_day(format: &DateFormat, today: Option<&str>) -> Result<NaiveDate> {
    match today {
        Some(value) => parse_date(format, value).context("--today"),
        None => Ok(Local::now().date_naive()),
    }
}

pub fn run_periods(args: &PeriodsArgs) -> Result<()> {
    let plugins = read_plugins(&args.picker.config)?;
    let (widget, picker) = select_picker(&plugins, args.picker.picker.map(Into::into))?;
    let config = picker.widget_config(default_bounds(Local::now().date_naive()))?;
    let issues = check_period_table(&picker.period_types);
    for issue in &issues {
        warn!(%widget, %issue, "period table issue");
    }
    print_periods(widget, &period_rows(&config), &issues);
    Ok(())
}

/// Returns false when no bucket covers the span.
pub fn run_bucket(args: &BucketArgs) -> Result<bool> {
    let plugins = read_plugins(&args.picker.config)?;
    let (widget, picker) = select_picker(&plugins, args.picker.picker.map(Into::into))?;
    let config = picker.widget_config(default_bounds(Local::now().date_naive()))?;
    let from = parse_date(&config.format, &args.from).context("--from")?;
    let to = parse_date(&config.format, &args.to).context("--to")?;
    let outcome = bucket(&config, from, to);
    if outcome.period.is_none() {
        error!(
            %widget,
            span_days = outcome.span_days,
            kind = RangeErrorKind::NoMatchingPeriodBucket.as_str(),
            "no period bucket covers the span"
        );
    }
    print_bucket(&outcome);
    Ok(outcome.period.is_some())
}

/// Returns the validation verdict.
pub fn run_validate(args: &ValidateArgs) -> Result<bool> {
    let format = DateFormat::new(args.time_unit.as_str()).context("--time-unit")?;
    let first = parse_date(&format, &args.first).context("--first")?;
    let last = parse_date(&format, &args.last).context("--last")?;
    let bounds = AvailableDateBounds::new(first, last);
    let parse = |value: Option<&String>| value.and_then(|value| format.parse_lenient(value));
    let result = validate_date_range(parse(args.from.as_ref()), parse(args.to.as_ref()), &bounds);
    print_validation(&result);
    Ok(result.is_valid)
}

/// Returns false when the range is rejected.
pub fn run_apply(args: &ApplyArgs) -> Result<bool> {
    let plugins = read_plugins(&args.picker.config)?;
    let (widget, picker) = select_picker(&plugins, args.picker.picker.map(Into::into))?;
    let format = picker.date_format()?;
    let today = reference_day(&format, args.bounds.today.as_deref())?;
    let bounds = match &args.bounds.available {
        Some(path) => load_available_dates(path, &format, default_bounds(today))
            .with_context(|| format!("load available dates {}", path.display()))?,
        None => default_bounds(today),
    };
    let config = picker.widget_config(bounds)?;
    let layers = read_layers(&args.map)?;
    let request = ApplyRequest {
        from: args
            .from
            .as_deref()
            .map(|value| parse_date(&format, value).context("--from"))
            .transpose()?,
        to: parse_date(&format, &args.to).context("--to")?,
        period: args
            .period
            .as_deref()
            .map(|value| value.parse::<PeriodKey>().context("--period"))
            .transpose()?,
        bounds,
    };

    let span = info_span!("apply", %widget, map = %args.map.display());
    let _guard = span.enter();
    let plan = match plan_apply(widget, &config, &layers, &request) {
        Ok(plan) => plan,
        Err(err) => {
            if let Some(kind) = err.downcast_ref::<RangeErrorKind>() {
                warn!(kind = kind.as_str(), "range rejected");
                eprintln!("rejected: {kind} ({})", kind.message_key());
                return Ok(false);
            }
            return Err(err);
        }
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&plan);
    }
    Ok(true)
}

pub fn run_replay(args: &ReplayArgs) -> Result<()> {
    let plugins = read_plugins(&args.config)?;
    let format = match plugins.primary() {
        Some((_, picker)) => picker.date_format()?,
        None => DateFormat::iso(),
    };
    let today = reference_day(&format, args.today.as_deref())?;
    let layers = read_layers(&args.map)?;
    let actions = read_actions(&args.events)?;
    let outcome = replay(&plugins, layers, actions, default_bounds(today))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_replay(&outcome);
    }
    Ok(())
}
