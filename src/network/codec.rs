//! Semicolon-delimited text form of a network.
//!
//! ```text
//! H;O;I;W
//! 1;bias;w0;w1;...      one line per hidden unit, in layer order
//! 2;bias;w0;w1;...      one line per output unit, in layer order
//! ```
//!
//! `H`/`O` are the hidden and output widths, `I`/`W` the weights per hidden
//! and per output unit.  Values are written with Rust's shortest exact `f64`
//! formatting, so parsing the text back gives bit-identical parameters.
//! When parsing, blank lines and lines starting with `#` are skipped and a
//! trailing `;` on any line is tolerated.

use std::fmt;
use std::str::FromStr;

use crate::errors::{MlpError, Result};
use crate::layers::unit::Unit;
use crate::network::network::Network;

const HIDDEN_TAG: &str = "1";
const OUTPUT_TAG: &str = "2";

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let topology = self.topology();
        writeln!(
            f,
            "{};{};{};{}",
            topology.hidden, topology.outputs, topology.inputs, topology.hidden
        )?;
        for unit in &self.hidden {
            write_unit(f, HIDDEN_TAG, unit)?;
        }
        for unit in &self.output {
            write_unit(f, OUTPUT_TAG, unit)?;
        }
        Ok(())
    }
}

fn write_unit(f: &mut fmt::Formatter<'_>, tag: &str, unit: &Unit) -> fmt::Result {
    write!(f, "{};{}", tag, unit.bias())?;
    for w in unit.weights() {
        write!(f, ";{}", w)?;
    }
    writeln!(f)
}

impl FromStr for Network {
    type Err = MlpError;

    fn from_str(text: &str) -> Result<Network> {
        let mut lines = text.lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

        let (header_no, header) = lines.next()
            .ok_or_else(|| MlpError::format("serialized network is empty"))?;
        let sizes = fields(header)
            .iter()
            .map(|cell| cell.parse::<usize>())
            .collect::<std::result::Result<Vec<usize>, _>>()
            .map_err(|_| MlpError::format(format!("line {}: header '{}' is not H;O;I;W", header_no, header)))?;
        let &[hidden_count, output_count, input_width, hidden_width] = sizes.as_slice() else {
            return Err(MlpError::format(format!(
                "line {}: header needs 4 fields, got {}",
                header_no,
                sizes.len()
            )));
        };
        if hidden_count == 0 || output_count == 0 || input_width == 0 {
            return Err(MlpError::format(format!("line {}: header declares an empty layer", header_no)));
        }
        if hidden_width != hidden_count {
            return Err(MlpError::format(format!(
                "line {}: output units need {} weights to match the hidden layer, header says {}",
                header_no, hidden_count, hidden_width
            )));
        }

        // Header counts are only trusted once the unit lines confirm them.
        let mut hidden = Vec::new();
        let mut output = Vec::new();

        for (line_no, line) in lines {
            let cells = fields(line);
            // `split` always yields at least one cell.
            let (layer, width) = match cells[0] {
                HIDDEN_TAG => (&mut hidden, input_width),
                OUTPUT_TAG => (&mut output, hidden_width),
                tag => {
                    return Err(MlpError::format(format!("line {}: unknown layer tag '{}'", line_no, tag)))
                }
            };
            if cells.len() != width + 2 {
                return Err(MlpError::format(format!(
                    "line {}: expected tag, bias and {} weights, got {} fields",
                    line_no,
                    width,
                    cells.len()
                )));
            }
            let values = cells[1..].iter()
                .map(|cell| {
                    cell.parse::<f64>().map_err(|_| {
                        MlpError::format(format!("line {}: '{}' is not a number", line_no, cell))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            layer.push(Unit::from_parts(values[1..].to_vec(), values[0]));
        }

        if hidden.len() != hidden_count || output.len() != output_count {
            return Err(MlpError::format(format!(
                "header declares {} hidden and {} output units, found {} and {}",
                hidden_count,
                output_count,
                hidden.len(),
                output.len()
            )));
        }

        Network::from_layers(hidden, output)
    }
}

/// Splits a line on `;`, trimming cells and dropping one trailing empty cell.
fn fields(line: &str) -> Vec<&str> {
    let mut cells: Vec<&str> = line.split(';').map(str::trim).collect();
    if cells.len() > 1 && cells.last() == Some(&"") {
        cells.pop();
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::Sample;
    use crate::network::topology::Topology;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn writes_header_and_tagged_lines() {
        let net = Network::from_layers(
            vec![Unit::from_parts(vec![0.5, -1.0], 0.25)],
            vec![Unit::from_parts(vec![2.0], -0.5), Unit::from_parts(vec![0.0], 1.0)],
        ).unwrap();
        assert_eq!(net.to_string(), "1;2;2;1\n1;0.25;0.5;-1\n2;-0.5;2\n2;1;0\n");
    }

    #[test]
    fn accepts_trailing_separators_and_comments() {
        let text = "# id: 1e0\n1;1;2;1;\n1;0.1;0.2;0.3\n\n2;0.4;0.5;\n";
        let net: Network = text.parse().unwrap();
        assert_eq!(net.topology(), Topology::new(2, 1, 1).unwrap());
        assert_eq!(net.hidden_units()[0].weights(), &[0.2, 0.3]);
        assert_eq!(net.output_units()[0].bias(), 0.4);
    }

    #[test]
    fn rejects_malformed_text() {
        let cases = [
            "",
            "1;1;2\n1;0;0;0\n2;0;0\n",
            "1;1;2;1\n1;0;0\n2;0;0\n",
            "1;1;2;1\n1;0;x;0\n2;0;0\n",
            "1;1;2;1\n3;0;0;0\n2;0;0\n",
            "2;1;2;2\n1;0;0;0\n2;0;0;0\n",
            "1;1;2;1\n1;0;0;0\n2;0;0\n2;0;0\n",
            "0;1;2;0\n2;0\n",
            "1;1;2;3\n1;0;0;0\n2;0;0;0;0\n",
            "18446744073709551615;1;1;18446744073709551615\n1;0;0\n2;0;0\n",
        ];
        for text in cases {
            let err = text.parse::<Network>().unwrap_err();
            assert!(matches!(err, MlpError::Format { .. }), "{text:?} gave {err}");
        }
    }

    proptest! {
        #[test]
        fn text_round_trip_keeps_parameters_and_predictions(
            seed in any::<u64>(),
            inputs in 1usize..6,
            hidden in 1usize..6,
            outputs in 1usize..6,
        ) {
            let topology = Topology::new(inputs, hidden, outputs).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let mut net = Network::random(topology, &mut rng).unwrap();
            let mut copy: Network = net.to_string().parse().unwrap();
            prop_assert_eq!(&copy, &net);
            for k in 0..8 {
                let features = (0..inputs).map(|j| ((k * 7 + j) as f64).cos() * 3.0).collect();
                let sample = Sample::new(features, 0);
                prop_assert_eq!(copy.forward(&sample).unwrap(), net.forward(&sample).unwrap());
                prop_assert_eq!(copy.outputs(), net.outputs());
            }
        }
    }
}
