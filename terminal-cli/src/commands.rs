use std::collections::BTreeMap;

use anyhow::{anyhow, bail, Context, Result};
use croupier_types::roulette::{
    line_starting_at, street_of, Amount, BetId, BetType, PredefinedSet, SettingUpdate, Slot,
};
use lazy_static::lazy_static;

pub const DEFAULT_HISTORY_LIMIT: usize = 10;
pub const DEFAULT_HOT_WINDOW: usize = 50;

#[derive(Clone)]
pub struct CommandDef {
    pub name: &'static str,
    pub usage: &'static str,
    pub desc: &'static str,
    pub group: &'static str,
}

const fn cmd(
    name: &'static str,
    usage: &'static str,
    desc: &'static str,
    group: &'static str,
) -> CommandDef {
    CommandDef {
        name,
        usage,
        desc,
        group,
    }
}

lazy_static! {
    pub static ref COMMANDS: Vec<CommandDef> = vec![
        // Betting
        cmd("bet", "/bet <type> [targets] [amt]", "Place a bet (amount defaults to chip)", "Betting"),
        cmd("remove", "/remove <id>", "Remove a bet by id", "Betting"),
        cmd("undo", "/undo", "Remove the last bet", "Betting"),
        cmd("clear", "/clear", "Remove every bet", "Betting"),
        cmd("double", "/double", "Double every bet", "Betting"),
        cmd("repeat", "/repeat", "Replay last round's bets", "Betting"),
        cmd("chip", "/chip [amt]", "Show or select the chip", "Betting"),
        cmd("spin", "/spin", "Spin the wheel", "Betting"),
        // Table
        cmd("bets", "/bets", "List current bets", "Table"),
        cmd("balance", "/balance", "Balance and stake", "Table"),
        cmd("history", "/history [n]", "Recent rounds", "Table"),
        cmd("stats", "/stats", "Session statistics", "Table"),
        cmd("hot", "/hot [window]", "Hot and cold numbers", "Table"),
        cmd("odds", "/odds [type]", "Payouts and house edge", "Table"),
        // Session
        cmd("reset", "/reset", "Restore the starting balance", "Session"),
        cmd("clearhistory", "/clearhistory", "Forget round history", "Session"),
        cmd("set", "/set <sound|speed> <value>", "Change a setting", "Session"),
        cmd("help", "/help", "Show grouped commands", "Session"),
        cmd("quit", "/quit", "Exit", "Session"),
    ];
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// `bet_type` stays a name so the table reports unknown types itself.
    Bet {
        bet_type: String,
        slots: Vec<Slot>,
        amount: Option<Amount>,
    },
    Remove(BetId),
    Undo,
    Clear,
    Double,
    Repeat,
    Spin,
    Chip(Option<Amount>),
    Bets,
    Balance,
    History(usize),
    Stats,
    Hot(usize),
    Odds(Option<BetType>),
    Reset,
    ClearHistory,
    Set(SettingUpdate),
    Help,
    Quit,
    Empty,
}

pub fn parse_line(line: &str) -> Result<Command> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Empty);
    }
    let Some(rest) = line.strip_prefix('/') else {
        bail!("Commands start with '/'");
    };
    let mut parts = rest.split_whitespace().map(str::to_string).collect::<Vec<_>>();
    if parts.is_empty() {
        return Ok(Command::Empty);
    }
    let cmd = parts.remove(0).to_lowercase();
    match cmd.as_str() {
        "bet" | "b" => parse_bet(parts),
        "remove" | "rm" => {
            let id = parts
                .first()
                .ok_or_else(|| anyhow!("Usage: /remove <id>"))?
                .trim_start_matches('#')
                .parse::<u64>()
                .context("bet id")?;
            Ok(Command::Remove(BetId(id)))
        }
        "undo" => Ok(Command::Undo),
        "clear" => Ok(Command::Clear),
        "double" => Ok(Command::Double),
        "repeat" | "rebet" => Ok(Command::Repeat),
        "spin" => Ok(Command::Spin),
        "chip" => parts
            .first()
            .map(|raw| raw.parse::<Amount>().context("chip amount"))
            .transpose()
            .map(Command::Chip),
        "bets" => Ok(Command::Bets),
        "balance" | "bal" => Ok(Command::Balance),
        "history" => Ok(Command::History(parse_count(&parts, DEFAULT_HISTORY_LIMIT)?)),
        "stats" => Ok(Command::Stats),
        "hot" | "cold" => Ok(Command::Hot(parse_count(&parts, DEFAULT_HOT_WINDOW)?)),
        "odds" => parts
            .first()
            .map(|raw| raw.parse::<BetType>().map_err(|err| anyhow!("{err}")))
            .transpose()
            .map(Command::Odds),
        "reset" => Ok(Command::Reset),
        "clearhistory" => Ok(Command::ClearHistory),
        "set" => {
            let [key, value] = parts.as_slice() else {
                bail!("Usage: /set <sound|speed> <value>");
            };
            Ok(Command::Set(SettingUpdate::parse(key, value)?))
        }
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err(anyhow!("Unknown command /{cmd}")),
    }
}

fn parse_count(parts: &[String], default: usize) -> Result<usize> {
    match parts.first() {
        Some(raw) => raw.parse().context("count"),
        None => Ok(default),
    }
}

/// `/bet <type> [targets] [amount]`. Inside bets name their numbers, streets
/// and lines name any number of their first street, dozens and columns take
/// an index 1-3, even-money bets take no target. A trailing token beyond the
/// targets is the amount.
fn parse_bet(mut args: Vec<String>) -> Result<Command> {
    if args.is_empty() {
        bail!("Usage: /bet <type> [targets] [amt]");
    }
    let name = args.remove(0).to_lowercase();
    let Ok(bet_type) = name.parse::<BetType>() else {
        return Ok(Command::Bet {
            bet_type: name,
            slots: Vec::new(),
            amount: None,
        });
    };

    let targets = match bet_type {
        BetType::Straight => 1,
        BetType::Split => 2,
        BetType::Corner => 4,
        BetType::Street | BetType::Line | BetType::Dozen | BetType::Column => 1,
        _ => 0,
    };
    let amount = match args.len() {
        n if n == targets => None,
        n if n == targets + 1 => Some(
            args.pop()
                .unwrap_or_default()
                .parse::<Amount>()
                .context("amount")?,
        ),
        _ => bail!("{bet_type} takes {targets} target(s) and an optional amount"),
    };

    let slots = match bet_type {
        BetType::Straight | BetType::Split | BetType::Corner => args
            .iter()
            .map(|raw| parse_target(raw))
            .collect::<Result<Vec<_>>>()?,
        BetType::Street => {
            let n = parse_number(&args[0])?;
            let street = street_of(n).ok_or_else(|| anyhow!("{n} is not on the layout"))?;
            street.map(Slot::Number).to_vec()
        }
        BetType::Line => {
            let n = parse_number(&args[0])?;
            let line = line_starting_at(n)
                .ok_or_else(|| anyhow!("no line starts at the street of {n}"))?;
            line.map(Slot::Number).to_vec()
        }
        BetType::Dozen => {
            let index = parse_number(&args[0])?;
            PredefinedSet::dozen(index)
                .ok_or_else(|| anyhow!("dozens are numbered 1-3"))?
                .slots()
        }
        BetType::Column => {
            let index = parse_number(&args[0])?;
            PredefinedSet::column(index)
                .ok_or_else(|| anyhow!("columns are numbered 1-3"))?
                .slots()
        }
        outside => PredefinedSet::for_bet_type(outside)
            .map(|set| set.slots())
            .unwrap_or_default(),
    };

    Ok(Command::Bet {
        bet_type: bet_type.name().to_string(),
        slots,
        amount,
    })
}

/// Numbers pass through unchecked so the table reports out-of-range slots.
fn parse_target(raw: &str) -> Result<Slot> {
    match raw {
        "00" => Ok(Slot::DoubleZero),
        "0" => Ok(Slot::Zero),
        other => Ok(Slot::Number(parse_number(other)?)),
    }
}

fn parse_number(raw: &str) -> Result<u8> {
    raw.parse::<u8>()
        .with_context(|| format!("`{raw}` is not a number"))
}

pub fn render_help() -> String {
    let mut by_group: BTreeMap<&str, Vec<&CommandDef>> = BTreeMap::new();
    for c in COMMANDS.iter() {
        by_group.entry(c.group).or_default().push(c);
    }
    let mut out = String::new();
    for (group, cmds) in by_group {
        out.push_str(&format!("\n[{group}]\n"));
        for c in cmds {
            out.push_str(&format!("  {:<30} {}\n", c.usage, c.desc));
        }
    }
    out.push_str("\nBet types: straight split street corner line dozen column red black even odd low high\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use croupier_types::roulette::AnimationSpeed;

    fn nums(numbers: &[u8]) -> Vec<Slot> {
        numbers.iter().map(|n| Slot::Number(*n)).collect()
    }

    #[test]
    fn test_inside_bets() {
        assert_eq!(
            parse_line("/bet straight 17 10").unwrap(),
            Command::Bet {
                bet_type: "straight".to_string(),
                slots: nums(&[17]),
                amount: Some(Amount::from_units(10)),
            }
        );
        assert_eq!(
            parse_line("/bet split 14 17").unwrap(),
            Command::Bet {
                bet_type: "split".to_string(),
                slots: nums(&[14, 17]),
                amount: None,
            }
        );
        assert_eq!(
            parse_line("/b straight 00 $2.50").unwrap(),
            Command::Bet {
                bet_type: "straight".to_string(),
                slots: vec![Slot::DoubleZero],
                amount: Some(Amount::from_cents(250)),
            }
        );
    }

    #[test]
    fn test_streets_and_lines_expand() {
        let Command::Bet { slots, .. } = parse_line("/bet street 14 5").unwrap() else {
            panic!("expected a bet");
        };
        assert_eq!(slots, nums(&[13, 14, 15]));
        let Command::Bet { slots, .. } = parse_line("/bet sixline 4").unwrap() else {
            panic!("expected a bet");
        };
        assert_eq!(slots, nums(&[4, 5, 6, 7, 8, 9]));
        assert!(parse_line("/bet line 34").is_err());
    }

    #[test]
    fn test_outside_bets() {
        let Command::Bet { bet_type, slots, amount } = parse_line("/bet dozen 2 25").unwrap() else {
            panic!("expected a bet");
        };
        assert_eq!(bet_type, "dozen");
        assert_eq!(slots, PredefinedSet::Dozen2.slots());
        assert_eq!(amount, Some(Amount::from_units(25)));

        let Command::Bet { slots, .. } = parse_line("/bet RED").unwrap() else {
            panic!("expected a bet");
        };
        assert_eq!(slots.len(), 18);
        assert!(parse_line("/bet column 4").is_err());
        assert!(parse_line("/bet red 5 5").is_err());
    }

    #[test]
    fn test_unknown_bet_type_passes_through() {
        assert_eq!(
            parse_line("/bet basket 5").unwrap(),
            Command::Bet {
                bet_type: "basket".to_string(),
                slots: vec![],
                amount: None,
            }
        );
    }

    #[test]
    fn test_session_commands() {
        assert_eq!(parse_line("/remove #3").unwrap(), Command::Remove(BetId(3)));
        assert_eq!(parse_line("/history").unwrap(), Command::History(DEFAULT_HISTORY_LIMIT));
        assert_eq!(parse_line("/hot 20").unwrap(), Command::Hot(20));
        assert_eq!(parse_line("/odds corner").unwrap(), Command::Odds(Some(BetType::Corner)));
        assert_eq!(
            parse_line("/chip 25").unwrap(),
            Command::Chip(Some(Amount::from_units(25)))
        );
        assert_eq!(
            parse_line("/set speed fast").unwrap(),
            Command::Set(SettingUpdate::AnimationSpeed(AnimationSpeed::Fast))
        );
        assert_eq!(parse_line("  ").unwrap(), Command::Empty);
        assert_eq!(parse_line("/QUIT").unwrap(), Command::Quit);
        assert!(parse_line("spin").is_err());
        assert!(parse_line("/jump").is_err());
        assert!(parse_line("/set volume 11").is_err());
    }

    #[test]
    fn test_help_lists_every_command() {
        let help = render_help();
        for c in COMMANDS.iter() {
            assert!(help.contains(c.usage), "{}", c.name);
        }
    }
}
