//! Line commands of the terminal front-end.

use {
    super::InputEvent,
    crate::{domain::Panel, models::OrderSide},
    std::str::FromStr,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Input(InputEvent),
    /// Redraw every panel.
    Show,
    /// New render surface width in pixels.
    Resize(f64),
    Help,
    Quit,
}

pub const HELP: &str = "\
  <enter> | n        advance by the selected step
  +N                 advance by N points
  step N             select the step (presets: 1, 5, 10)
  buy|sell|close P I place an order on panel P (signal, trend, scope) at window index I
  show               redraw all panels
  width PX           set the chart width used for label density
  q                  quit";

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let command = match words.as_slice() {
            [] | ["n"] => Command::Input(InputEvent::Advance),
            ["q"] | ["quit"] => Command::Quit,
            ["show"] => Command::Show,
            ["help"] | ["?"] => Command::Help,
            ["step", n] => Command::Input(InputEvent::SetStep(parse_count(n)?)),
            ["width", px] => match px.parse::<f64>() {
                Ok(width) if width.is_finite() && width >= 0.0 => Command::Resize(width),
                _ => return Err(format!("'{}' is not a width in pixels", px)),
            },
            [side, panel, index] => {
                let side = match *side {
                    "buy" => OrderSide::Buy,
                    "sell" => OrderSide::Sell,
                    "close" => OrderSide::Close,
                    other => return Err(format!("unknown command '{}'", other)),
                };
                let panel =
                    Panel::from_str(panel).map_err(|_| format!("unknown panel '{}'", panel))?;
                Command::Input(InputEvent::Order {
                    panel,
                    index: parse_count(index)?,
                    side,
                })
            }
            [word] if word.starts_with('+') => {
                Command::Input(InputEvent::AdvanceBy(parse_count(&word[1..])?))
            }
            _ => return Err(format!("unknown command '{}'", line.trim())),
        };
        Ok(command)
    }
}

fn parse_count(text: &str) -> Result<usize, String> {
    text.parse()
        .map_err(|_| format!("'{}' is not a non-negative number", text))
}
