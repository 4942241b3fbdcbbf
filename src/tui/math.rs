//! LaTeX → Unicode typesetting for terminal display.
//!
//! Covers the subset a physics tutor actually writes: Greek letters,
//! operators and relations, `\frac`, `\sqrt`, accents, `\text`, scripts.
//! Unknown commands pass through literally. Structural mistakes (unbalanced
//! braces, a `\frac` missing its denominator, a dangling `^`) are errors so
//! the caller can fall back to showing the source.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    UnbalancedBraces,
    /// The named command or script operator had nothing to apply to.
    MissingArgument(String),
    /// Groups, scripts or command arguments nest deeper than `MAX_DEPTH`.
    TooDeep,
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathError::UnbalancedBraces => write!(f, "unbalanced braces"),
            MathError::MissingArgument(cmd) => write!(f, "missing argument for {cmd}"),
            MathError::TooDeep => write!(f, "nesting deeper than {MAX_DEPTH} levels"),
        }
    }
}

impl std::error::Error for MathError {}

/// Nesting limit for groups, scripts and command arguments.
const MAX_DEPTH: usize = 64;

/// Typesets a LaTeX math fragment (without its `$` delimiters).
pub fn typeset(src: &str) -> Result<String, MathError> {
    let mut parser = Parser {
        chars: src.chars().collect(),
        pos: 0,
        depth: 0,
    };
    parser.sequence(false)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Reads atoms until end of input, or until the closing `}` of a group.
    fn sequence(&mut self, in_group: bool) -> Result<String, MathError> {
        let mut out = String::new();
        loop {
            match self.peek() {
                None if in_group => return Err(MathError::UnbalancedBraces),
                None => return Ok(out),
                Some('}') if in_group => {
                    self.pos += 1;
                    return Ok(out);
                }
                Some('}') => return Err(MathError::UnbalancedBraces),
                Some(_) => {
                    let atom = self.atom()?;
                    out.push_str(&atom);
                }
            }
        }
    }

    fn atom(&mut self) -> Result<String, MathError> {
        if self.depth >= MAX_DEPTH {
            return Err(MathError::TooDeep);
        }
        self.depth += 1;
        let result = self.nested_atom();
        self.depth -= 1;
        result
    }

    fn nested_atom(&mut self) -> Result<String, MathError> {
        let Some(c) = self.bump() else {
            return Ok(String::new());
        };
        match c {
            '{' => self.sequence(true),
            '\\' => self.command(),
            '^' => {
                let arg = self.argument("^")?;
                Ok(script(&arg, superscript_char, '^'))
            }
            '_' => {
                let arg = self.argument("_")?;
                Ok(script(&arg, subscript_char, '_'))
            }
            '~' | '&' => Ok(" ".to_string()),
            other => Ok(other.to_string()),
        }
    }

    /// The operand of a command or script: a group, a command, or one char.
    fn argument(&mut self, owner: &str) -> Result<String, MathError> {
        self.skip_whitespace();
        match self.peek() {
            None | Some('}') => Err(MathError::MissingArgument(owner.to_string())),
            Some(_) => self.atom(),
        }
    }

    fn command(&mut self) -> Result<String, MathError> {
        let name = match self.peek() {
            None => return Err(MathError::MissingArgument("\\".to_string())),
            Some(c) if c.is_ascii_alphabetic() => {
                let start = self.pos;
                while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
                    self.pos += 1;
                }
                self.chars[start..self.pos].iter().collect::<String>()
            }
            Some(c) => {
                self.pos += 1;
                c.to_string()
            }
        };

        if let Some(sym) = symbol(&name) {
            return Ok(sym.to_string());
        }

        let owner = format!("\\{name}");
        match name.as_str() {
            "frac" | "dfrac" | "tfrac" => {
                let num = self.argument(&owner)?;
                let den = self.argument(&owner)?;
                Ok(format!("{}/{}", wrap(&num), wrap(&den)))
            }
            "sqrt" => {
                let radical = if self.peek() == Some('[') {
                    self.pos += 1;
                    let start = self.pos;
                    while self.peek().is_some_and(|c| c != ']') {
                        self.pos += 1;
                    }
                    if self.bump().is_none() {
                        return Err(MathError::MissingArgument(owner));
                    }
                    match self.chars[start..self.pos - 1].iter().collect::<String>().trim() {
                        "3" => '∛',
                        "4" => '∜',
                        _ => '√',
                    }
                } else {
                    '√'
                };
                let body = self.argument(&owner)?;
                Ok(format!("{radical}{}", wrap(&body)))
            }
            "vec" => Ok(format!("{}\u{20D7}", self.argument(&owner)?)),
            "hat" => Ok(format!("{}\u{0302}", self.argument(&owner)?)),
            "bar" | "overline" => Ok(format!("{}\u{0304}", self.argument(&owner)?)),
            "dot" => Ok(format!("{}\u{0307}", self.argument(&owner)?)),
            "text" | "textrm" | "textbf" | "textit" | "mathrm" | "mathbf" | "mathit"
            | "mathcal" | "operatorname" | "mbox" | "boldsymbol" => self.argument(&owner),
            "left" | "right" | "big" | "Big" | "bigg" | "Bigg" => {
                // `\left.` is an invisible delimiter
                if self.peek() == Some('.') {
                    self.pos += 1;
                }
                Ok(String::new())
            }
            "displaystyle" | "limits" | "nolimits" => Ok(String::new()),
            _ if is_function_name(&name) => Ok(name),
            _ => Ok(format!("\\{name}")),
        }
    }
}

/// Parenthesizes multi-symbol operands of `/` and `√`.
fn wrap(s: &str) -> String {
    let compact = s.chars().count() <= 1
        || s.chars().all(|c| c.is_alphanumeric() || c == '.');
    if compact { s.to_string() } else { format!("({s})") }
}

/// Uses Unicode script characters when every character has one,
/// otherwise falls back to `^(...)` / `_(...)`.
fn script(arg: &str, map: fn(char) -> Option<char>, marker: char) -> String {
    let mapped: Option<String> = arg.chars().map(map).collect();
    match mapped {
        Some(s) if !s.is_empty() => s,
        _ if arg.chars().count() == 1 => format!("{marker}{arg}"),
        _ => format!("{marker}({arg})"),
    }
}

fn superscript_char(c: char) -> Option<char> {
    Some(match c {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        '+' => '⁺',
        '-' | '−' => '⁻',
        '=' => '⁼',
        '(' => '⁽',
        ')' => '⁾',
        '∘' => '°',
        '′' => '′',
        'a' => 'ᵃ',
        'b' => 'ᵇ',
        'c' => 'ᶜ',
        'd' => 'ᵈ',
        'e' => 'ᵉ',
        'f' => 'ᶠ',
        'g' => 'ᵍ',
        'h' => 'ʰ',
        'i' => 'ⁱ',
        'j' => 'ʲ',
        'k' => 'ᵏ',
        'l' => 'ˡ',
        'm' => 'ᵐ',
        'n' => 'ⁿ',
        'o' => 'ᵒ',
        'p' => 'ᵖ',
        'r' => 'ʳ',
        's' => 'ˢ',
        't' => 'ᵗ',
        'u' => 'ᵘ',
        'v' => 'ᵛ',
        'w' => 'ʷ',
        'x' => 'ˣ',
        'y' => 'ʸ',
        'z' => 'ᶻ',
        'T' => 'ᵀ',
        _ => return None,
    })
}

fn subscript_char(c: char) -> Option<char> {
    Some(match c {
        '0' => '₀',
        '1' => '₁',
        '2' => '₂',
        '3' => '₃',
        '4' => '₄',
        '5' => '₅',
        '6' => '₆',
        '7' => '₇',
        '8' => '₈',
        '9' => '₉',
        '+' => '₊',
        '-' | '−' => '₋',
        '=' => '₌',
        '(' => '₍',
        ')' => '₎',
        'a' => 'ₐ',
        'e' => 'ₑ',
        'h' => 'ₕ',
        'i' => 'ᵢ',
        'j' => 'ⱼ',
        'k' => 'ₖ',
        'l' => 'ₗ',
        'm' => 'ₘ',
        'n' => 'ₙ',
        'o' => 'ₒ',
        'p' => 'ₚ',
        'r' => 'ᵣ',
        's' => 'ₛ',
        't' => 'ₜ',
        'u' => 'ᵤ',
        'v' => 'ᵥ',
        'x' => 'ₓ',
        _ => return None,
    })
}

fn is_function_name(name: &str) -> bool {
    matches!(
        name,
        "sin" | "cos" | "tan" | "cot" | "sec" | "csc" | "arcsin" | "arccos" | "arctan"
            | "sinh" | "cosh" | "tanh" | "log" | "ln" | "lg" | "exp" | "lim" | "max" | "min"
            | "det"
    )
}

fn symbol(name: &str) -> Option<&'static str> {
    Some(match name {
        // Greek
        "alpha" => "α",
        "beta" => "β",
        "gamma" => "γ",
        "delta" => "δ",
        "epsilon" => "ϵ",
        "varepsilon" => "ε",
        "zeta" => "ζ",
        "eta" => "η",
        "theta" => "θ",
        "vartheta" => "ϑ",
        "iota" => "ι",
        "kappa" => "κ",
        "lambda" => "λ",
        "mu" => "μ",
        "nu" => "ν",
        "xi" => "ξ",
        "pi" => "π",
        "rho" => "ρ",
        "sigma" => "σ",
        "tau" => "τ",
        "upsilon" => "υ",
        "phi" => "ϕ",
        "varphi" => "φ",
        "chi" => "χ",
        "psi" => "ψ",
        "omega" => "ω",
        "Gamma" => "Γ",
        "Delta" => "Δ",
        "Theta" => "Θ",
        "Lambda" => "Λ",
        "Xi" => "Ξ",
        "Pi" => "Π",
        "Sigma" => "Σ",
        "Phi" => "Φ",
        "Psi" => "Ψ",
        "Omega" => "Ω",
        // Operators and relations
        "times" => "×",
        "cdot" => "·",
        "div" => "÷",
        "pm" => "±",
        "mp" => "∓",
        "le" | "leq" => "≤",
        "ge" | "geq" => "≥",
        "ne" | "neq" => "≠",
        "approx" => "≈",
        "sim" => "∼",
        "equiv" => "≡",
        "propto" => "∝",
        "ll" => "≪",
        "gg" => "≫",
        "perp" => "⊥",
        "parallel" => "∥",
        "angle" => "∠",
        // Arrows
        "to" | "rightarrow" => "→",
        "leftarrow" => "←",
        "Rightarrow" => "⇒",
        "implies" => "⟹",
        "Leftrightarrow" | "iff" => "⇔",
        "uparrow" => "↑",
        "downarrow" => "↓",
        // Calculus and misc
        "infty" => "∞",
        "partial" => "∂",
        "nabla" => "∇",
        "sum" => "∑",
        "prod" => "∏",
        "int" => "∫",
        "oint" => "∮",
        "circ" => "∘",
        "degree" => "°",
        "prime" => "′",
        "hbar" => "ℏ",
        "ell" => "ℓ",
        "cdots" => "⋯",
        "ldots" | "dots" => "…",
        "therefore" => "∴",
        // Spacing and escapes
        "," | ":" | ";" | " " | "quad" => " ",
        "qquad" => "  ",
        "!" => "",
        "\\" => " ",
        "{" => "{",
        "}" => "}",
        "%" => "%",
        "$" => "$",
        "#" => "#",
        "&" => "&",
        "_" => "_",
        _ => return None,
    })
}
