//! `ferp inv` command - Fabric inventory

use clap::Subcommand;
use console::style;
use miette::Result;
use rust_decimal::Decimal;

use crate::cli::context::print_notice;
use crate::cli::helpers::{format_meters, parse_meters};
use crate::cli::output::{effective_format, print_serialized};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{CliContext, GlobalOpts, OutputFormat};
use crate::console::list::fabric_options;
use crate::console::{Debouncer, FormMode, InventoryFilters, NameFilter, StockFilter};
use crate::core::config::Config;
use crate::core::role::Section;
use crate::entities::inventory::{InventoryForm, InventoryItem};

#[derive(Subcommand, Debug)]
pub enum InvCommands {
    /// List inventory with fabric and stock filters
    List(ListArgs),

    /// Search fabrics by name, color or GSM (the request form picker)
    Search(SearchArgs),

    /// Show an inventory record
    Show(ShowArgs),

    /// Add stock
    New(InventoryFields),

    /// Update an inventory record
    Edit(EditArgs),

    /// Delete an inventory record
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Exact fabric name, or "all"
    #[arg(long)]
    pub fabric: Option<String>,

    /// Stock band
    #[arg(long, short = 's', value_enum, default_value_t = StockFilter::All)]
    pub stock: StockFilter,

    /// Print the fabric names available to --fabric and exit
    #[arg(long)]
    pub fabrics: bool,
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Case-insensitive text matched against name, color and GSM
    #[arg(default_value = "")]
    pub term: String,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Inventory ID
    pub id: String,
}

#[derive(clap::Args, Debug, Default)]
pub struct InventoryFields {
    #[arg(long)]
    pub fabric_name: Option<String>,

    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub gsm: Option<u32>,

    /// Available meters
    #[arg(long, value_parser = parse_meters)]
    pub meters: Option<Decimal>,
}

impl InventoryFields {
    fn apply(self, form: &mut InventoryForm) {
        if let Some(v) = self.fabric_name {
            form.fabric_name = v;
        }
        if let Some(v) = self.color {
            form.color = v;
        }
        if let Some(v) = self.gsm {
            form.gsm = v;
        }
        if let Some(v) = self.meters {
            form.available_meters = v;
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Inventory ID
    pub id: String,

    #[command(flatten)]
    pub fields: InventoryFields,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Inventory ID
    pub id: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

const INV_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 12),
    ColumnDef::new("fabric", "FABRIC", 24),
    ColumnDef::new("color", "COLOR", 14),
    ColumnDef::new("gsm", "GSM", 6),
    ColumnDef::new("meters", "AVAILABLE", 12),
    ColumnDef::new("stock", "STOCK", 8),
];

pub async fn run(cmd: InvCommands, config: Config, global: &GlobalOpts) -> Result<()> {
    let ctx = CliContext::new(config, global)?;
    match cmd {
        InvCommands::List(args) => run_list(&ctx, args, global).await,
        InvCommands::Search(args) => run_search(&ctx, args, global).await,
        InvCommands::Show(args) => run_show(&ctx, args, global).await,
        InvCommands::New(fields) => run_save(&ctx, FormMode::Create, fields, global).await,
        InvCommands::Edit(args) => {
            run_save(&ctx, FormMode::Edit(args.id), args.fields, global).await
        }
        InvCommands::Delete(args) => run_delete(&ctx, args).await,
    }
}

fn item_to_row(item: &InventoryItem) -> TableRow {
    TableRow::new(item.id.clone())
        .cell("id", CellValue::Id(item.id.clone()))
        .cell("fabric", CellValue::Text(item.fabric_name.clone()))
        .cell("color", CellValue::Text(item.color.clone()))
        .cell("gsm", CellValue::Number(item.gsm.into()))
        .cell("meters", CellValue::Meters(item.available_meters))
        .cell("stock", CellValue::Text(item.stock_level().to_string()))
}

async fn run_list(ctx: &CliContext, args: ListArgs, global: &GlobalOpts) -> Result<()> {
    ctx.require(Section::Inventory)?;

    let items = ctx.console.inventory().await.map_err(|e| ctx.fail(e))?;

    if args.fabrics {
        for name in fabric_options(&items) {
            println!("{}", name);
        }
        return Ok(());
    }

    let filters = InventoryFilters {
        fabric: NameFilter::from_option(args.fabric.as_deref()),
        stock: args.stock,
    };
    let visible: Vec<InventoryItem> = filters.apply(&items).into_iter().cloned().collect();

    let format = effective_format(global.format, true);
    if print_serialized(&visible, format)? {
        return Ok(());
    }
    let rows = visible.iter().map(item_to_row).collect();
    TableFormatter::new(INV_COLUMNS, "inventory item").output(rows, format, &[])
}

async fn run_search(ctx: &CliContext, args: SearchArgs, global: &GlobalOpts) -> Result<()> {
    ctx.require(Section::SampleRequests)?;

    let mut picker = ctx
        .console
        .fabric_autocomplete()
        .await
        .map_err(|e| ctx.fail(e))?;
    let debouncer = Debouncer::new(ctx.config.debounce());
    picker.input(&debouncer, args.term).await;

    let hits: Vec<InventoryItem> = picker.suggestions().into_iter().cloned().collect();
    let format = effective_format(global.format, true);
    if print_serialized(&hits, format)? {
        return Ok(());
    }
    let rows = hits.iter().map(item_to_row).collect();
    TableFormatter::new(INV_COLUMNS, "fabric").output(rows, format, &[])
}

async fn run_show(ctx: &CliContext, args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    ctx.require(Section::Inventory)?;

    let item = ctx
        .console
        .inventory_item(&args.id)
        .await
        .map_err(|e| ctx.fail(e))?;

    if print_serialized(&item, global.format)? {
        return Ok(());
    }
    if global.format == OutputFormat::Id {
        println!("{}", item.id);
        return Ok(());
    }

    println!("{}", style("─".repeat(50)).dim());
    println!("{}: {}", style("ID").bold(), style(&item.id).cyan());
    println!(
        "{}: {}",
        style("Fabric").bold(),
        style(&item.fabric_name).yellow()
    );
    println!("{}: {}", style("Color").bold(), item.color);
    println!("{}: {}", style("GSM").bold(), item.gsm);
    println!(
        "{}: {} ({})",
        style("Available").bold(),
        format_meters(item.available_meters),
        item.stock_level()
    );
    println!("{}", style("─".repeat(50)).dim());
    Ok(())
}

async fn run_save(
    ctx: &CliContext,
    mode: FormMode,
    fields: InventoryFields,
    global: &GlobalOpts,
) -> Result<()> {
    ctx.require(Section::Inventory)?;

    let mut form = match &mode {
        FormMode::Create => InventoryForm::default(),
        FormMode::Edit(id) => {
            let item = ctx
                .console
                .inventory_item(id)
                .await
                .map_err(|e| ctx.fail(e))?;
            InventoryForm::from(&item)
        }
    };
    fields.apply(&mut form);

    let saved = ctx
        .console
        .save_inventory(&mode, &form)
        .await
        .map_err(|e| ctx.fail(e))?;

    if global.format == OutputFormat::Id {
        println!("{}", saved.record.id);
    } else if !print_serialized(&saved.record, global.format)? {
        print_notice(&saved.notice);
        println!(
            "   {} {} ({})",
            saved.record.fabric_name,
            saved.record.color,
            format_meters(saved.record.available_meters)
        );
    }
    Ok(())
}

async fn run_delete(ctx: &CliContext, args: DeleteArgs) -> Result<()> {
    ctx.require(Section::Inventory)?;

    let prompt = format!("Delete inventory item {}?", args.id);
    match ctx.confirm(&prompt, args.yes)? {
        Some(true) => {}
        Some(false) => {
            println!("Aborted.");
            return Ok(());
        }
        None => miette::bail!("Refusing to delete without confirmation; pass --yes"),
    }

    let notice = ctx
        .console
        .delete_inventory(&args.id)
        .await
        .map_err(|e| ctx.fail(e))?;
    print_notice(&notice);
    Ok(())
}
