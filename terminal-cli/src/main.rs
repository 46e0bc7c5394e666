mod commands;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::mpsc::Receiver;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use croupier_execution::payout::{expected_value, house_edge, odds_display};
use croupier_execution::{
    channel, Event, FileStore, KeyValueStore, MemoryStore, SlotFrequency, Table, TableError,
    Wheel,
};
use croupier_types::roulette::ChipSet;
use croupier_types::{Amount, BetType, HistoryEntry, RuleConfig};
use directories::ProjectDirs;
use tracing::{info, Level};

use commands::{parse_line, render_help, Command};

/// CLI flags
#[derive(Parser, Debug)]
#[command(name = "croupier", about = "American roulette at the terminal")]
struct Args {
    /// YAML house rules (limits, chips, starting balance); amounts in cents
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where balance, history and settings are kept
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Seed the wheel for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// trace, debug, info, warn or error
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Keep state in memory only
    #[arg(long)]
    memory: bool,
}

type CliTable = Table<Box<dyn KeyValueStore>, Wheel>;

struct Session {
    table: CliTable,
    events: Receiver<Event>,
    chip: Amount,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = Level::from_str(&args.log_level)
        .map_err(|_| anyhow!("invalid log level `{}`", args.log_level))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let rules = match &args.config {
        Some(path) => load_rules(path)?,
        None => RuleConfig::default(),
    };
    let store: Box<dyn KeyValueStore> = if args.memory {
        Box::new(MemoryStore::new())
    } else {
        let dir = match &args.data_dir {
            Some(dir) => dir.clone(),
            None => default_data_dir()
                .ok_or_else(|| anyhow!("no home directory; pass --data-dir"))?,
        };
        Box::new(
            FileStore::open(&dir)
                .with_context(|| format!("open data directory {}", dir.display()))?,
        )
    };
    let wheel = match args.seed {
        Some(seed) => Wheel::seeded(seed),
        None => Wheel::from_entropy(),
    };

    let chip = rules.chips.selected;
    let mut table = Table::open(rules, store, wheel).context("invalid house rules")?;
    let (observer, events) = channel();
    table.subscribe(observer);
    info!(seeded = args.seed.is_some(), memory = args.memory, "session started");

    if let Some(reason) = table.storage_degraded() {
        println!("! storage unavailable ({reason}); this session will not be saved");
    }
    let mut session = Session {
        table,
        events,
        chip,
    };
    println!("American roulette. Balance {}. Type /help.", session.table.balance());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{} > ", session.table.balance());
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("read command")?;
        match parse_line(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => {
                let output = session.execute(command);
                if !output.is_empty() {
                    println!("{output}");
                }
            }
            Err(err) => println!("{err:#}"),
        }
        session.drain_events();
    }
    Ok(())
}

fn load_rules(path: &Path) -> Result<RuleConfig> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let rules: RuleConfig = serde_yaml::from_str(&data)
        .with_context(|| format!("parse config {}", path.display()))?;
    rules.validate().context("invalid house rules")?;
    Ok(rules)
}

fn default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("dev", "croupier", "croupier").map(|d| d.data_dir().to_path_buf())
}

impl Session {
    fn execute(&mut self, command: Command) -> String {
        match self.try_execute(command) {
            Ok(output) => output,
            Err(err) => format!("✗ {err}"),
        }
    }

    fn try_execute(&mut self, command: Command) -> Result<String, TableError> {
        let table = &mut self.table;
        Ok(match command {
            Command::Bet {
                bet_type,
                slots,
                amount,
            } => {
                let amount = amount.unwrap_or(self.chip);
                let bet = table.place_named_bet(&bet_type, slots, amount, None)?;
                format!(
                    "{} {} on {} | staked {} | available {}",
                    bet.id,
                    bet.amount,
                    bet.describe(),
                    table.total_staked(),
                    table.available_balance()
                )
            }
            Command::Remove(id) => {
                let bet = table.remove_bet(id)?;
                format!("removed {} {}", bet.id, bet.describe())
            }
            Command::Undo => {
                let bet = table.undo_last_bet()?;
                format!("undid {} {}", bet.id, bet.describe())
            }
            Command::Clear => {
                let cleared = table.clear_bets()?;
                format!("cleared {} bet(s)", cleared.len())
            }
            Command::Double => {
                let placed = table.double_bets()?;
                format!("doubled {} bet(s), staked {}", placed.len(), table.total_staked())
            }
            Command::Repeat => {
                let placed = table.repeat_bets()?;
                format!("repeated {} bet(s), staked {}", placed.len(), table.total_staked())
            }
            Command::Spin => {
                let result = table.spin()?;
                let mut out = format!(
                    "● {} {}\n",
                    result.winning_slot,
                    result.winning_slot.color()
                );
                for win in &result.winners {
                    out.push_str(&format!(
                        "  ✓ {} {} pays {}\n",
                        win.bet.describe(),
                        win.bet.amount,
                        win.total_return
                    ));
                }
                for loss in &result.losers {
                    out.push_str(&format!("  ✗ {} {}\n", loss.bet.describe(), loss.bet.amount));
                }
                out.push_str(&format!(
                    "net {} | balance {}",
                    signed(result.net_profit),
                    table.balance()
                ));
                out
            }
            Command::Chip(None) => {
                let chips = &table.rules().chips.denominations;
                let listed = chips
                    .iter()
                    .map(|chip| {
                        if *chip == self.chip {
                            format!("[{chip}]")
                        } else {
                            chip.to_string()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("chips: {listed}")
            }
            Command::Chip(Some(amount)) => {
                if !table.rules().chips.contains(amount) {
                    return Ok(format!("no {amount} chip at this table"));
                }
                self.chip = amount;
                format!("chip set to {amount}")
            }
            Command::Bets => {
                let bets = table.current_bets();
                if bets.is_empty() {
                    "no bets".to_string()
                } else {
                    let chips = &table.rules().chips;
                    bets.iter()
                        .map(|bet| {
                            format!(
                                "{} {} on {} ({})",
                                bet.id,
                                bet.amount,
                                bet.describe(),
                                render_chips(chips, bet.amount)
                            )
                        })
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
            Command::Balance => format!(
                "balance {} | staked {} | available {}",
                table.balance(),
                table.total_staked(),
                table.available_balance()
            ),
            Command::History(limit) => render_history(&table.history(Some(limit))),
            Command::Stats => {
                let stats = table.statistics();
                let colors = table.color_distribution(table.rules().history_capacity);
                format!(
                    "rounds {} | won {} | lost {} | win rate {:.1}%\n\
                     staked {} | returned {} | net {}\n\
                     biggest win {} | biggest loss {}\n\
                     red {} | black {} | green {}",
                    stats.rounds_played,
                    stats.rounds_won,
                    stats.rounds_lost,
                    stats.win_rate,
                    stats.total_staked,
                    stats.total_returned,
                    signed(stats.net_profit),
                    stats.biggest_win,
                    stats.biggest_loss,
                    colors.red,
                    colors.black,
                    colors.green
                )
            }
            Command::Hot(window) => {
                let hot_cold = table.hot_cold_slots(window);
                let list = |slots: &[SlotFrequency]| {
                    slots
                        .iter()
                        .map(|f| format!("{}×{}", f.slot, f.hits))
                        .collect::<Vec<_>>()
                        .join(" ")
                };
                format!(
                    "last {} spins\nhot  {}\ncold {}",
                    hot_cold.window,
                    list(&hot_cold.hot),
                    list(&hot_cold.cold)
                )
            }
            Command::Odds(bet_type) => {
                let types = match bet_type {
                    Some(bet_type) => vec![bet_type],
                    None => BetType::ALL.to_vec(),
                };
                types
                    .into_iter()
                    .map(|bet_type| {
                        format!(
                            "{:<9} {:>5}  edge {:.2}%  EV per $100 {:+.2}",
                            bet_type.name(),
                            odds_display(bet_type),
                            house_edge(bet_type),
                            expected_value(bet_type, Amount::from_units(100))
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Command::Reset => {
                let change = table.reset_balance()?;
                format!("balance reset to {}", change.new)
            }
            Command::ClearHistory => {
                table.clear_history()?;
                "history cleared".to_string()
            }
            Command::Set(update) => {
                table.update_setting(update);
                let settings = table.settings();
                format!(
                    "sound {} | speed {}",
                    if settings.sound_enabled { "on" } else { "off" },
                    settings.animation_speed
                )
            }
            Command::Help => render_help(),
            Command::Quit | Command::Empty => String::new(),
        })
    }

    /// Prints notifications that have no command output of their own.
    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            if let Event::StorageDegraded { reason } = event {
                println!("! storage unavailable ({reason}); this session will not be saved");
            }
        }
    }
}

fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "no rounds yet".to_string();
    }
    entries
        .iter()
        .map(|entry| {
            format!(
                "{:>2} {:<5} staked {} returned {} net {}",
                entry.winning_slot,
                entry.color,
                entry.total_staked,
                entry.total_returned,
                signed(entry.net_profit)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Chip stacks for a stake, largest first, e.g. `1×$25.00 2×$1.00`.
fn render_chips(chips: &ChipSet, amount: Amount) -> String {
    let (stacks, rest) = chips.breakdown(amount);
    let mut parts = stacks
        .iter()
        .map(|(chip, count)| format!("{count}×{chip}"))
        .collect::<Vec<_>>();
    if !rest.is_zero() {
        parts.push(format!("+{rest}"));
    }
    parts.join(" ")
}

/// Signed cents as currency, e.g. `+$3.50`.
fn signed(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "+" };
    format!("{sign}{}", Amount::from_cents(cents.unsigned_abs()))
}
