//! Binary, unary, assignment and update operators.
//!
//! Precedence table (higher binds tighter):
//!
//! | Level | Operators |
//! |---|---|
//! | 10 | `*` `/` `%` |
//! | 9 | `+` `-` |
//! | 8 | `<<` `>>` `>>>` |
//! | 7 | `&` |
//! | 6 | `^` |
//! | 5 | `\|` |
//! | 4 | `<` `<=` `>` `>=` |
//! | 3 | `==` `!=` |
//! | 2 | `&&` |
//! | 1 | `\|\|` |
//!
//! Bitwise operators sit above the relational tier, unlike C.

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Multiplicative
    Mul,
    Div,
    Mod,
    // Additive
    Add,
    Sub,
    // Shift
    Shl,
    Shr,
    UShr,
    // Bitwise
    BitAnd,
    BitXor,
    BitOr,
    // Relational
    Lt,
    LtEq,
    Gt,
    GtEq,
    // Equality
    Eq,
    NotEq,
    // Logical
    And,
    Or,
}

impl BinaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::UShr => ">>>",
            Self::BitAnd => "&",
            Self::BitXor => "^",
            Self::BitOr => "|",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }

    /// Binding strength; see the module table.
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Mul | Self::Div | Self::Mod => 10,
            Self::Add | Self::Sub => 9,
            Self::Shl | Self::Shr | Self::UShr => 8,
            Self::BitAnd => 7,
            Self::BitXor => 6,
            Self::BitOr => 5,
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => 4,
            Self::Eq | Self::NotEq => 3,
            Self::And => 2,
            Self::Or => 1,
        }
    }

    /// Look up a binary operator by its source text.
    pub fn from_symbol(text: &str) -> Option<Self> {
        Some(match text {
            "*" => Self::Mul,
            "/" => Self::Div,
            "%" => Self::Mod,
            "+" => Self::Add,
            "-" => Self::Sub,
            "<<" => Self::Shl,
            ">>" => Self::Shr,
            ">>>" => Self::UShr,
            "&" => Self::BitAnd,
            "^" => Self::BitXor,
            "|" => Self::BitOr,
            "<" => Self::Lt,
            "<=" => Self::LtEq,
            ">" => Self::Gt,
            ">=" => Self::GtEq,
            "==" => Self::Eq,
            "!=" => Self::NotEq,
            "&&" => Self::And,
            "||" => Self::Or,
            _ => return None,
        })
    }

    /// `&&` and `||` evaluate their right operand conditionally.
    pub const fn is_short_circuit(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

/// Prefix operators (`++`/`--` are [`UpdateOp`]).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Plus,
    Neg,
    Not,
    BitNot,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Neg => "-",
            Self::Not => "!",
            Self::BitNot => "~",
        }
    }

    pub fn from_symbol(text: &str) -> Option<Self> {
        match text {
            "+" => Some(Self::Plus),
            "-" => Some(Self::Neg),
            "!" => Some(Self::Not),
            "~" => Some(Self::BitNot),
            _ => None,
        }
    }
}

/// `=` or a compound assignment such as `+=`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AssignOp {
    Assign,
    Compound(BinaryOp),
}

impl AssignOp {
    pub fn from_symbol(text: &str) -> Option<Self> {
        if text == "=" {
            return Some(Self::Assign);
        }
        let op = text.strip_suffix('=')?;
        // `==`, `<=`, `>=`, `!=` end in `=` but are not assignments.
        match op {
            "*" | "/" | "%" | "+" | "-" | "<<" | ">>" | ">>>" | "&" | "^" | "|" => {
                BinaryOp::from_symbol(op).map(Self::Compound)
            }
            _ => None,
        }
    }

    pub fn as_symbol(self) -> String {
        match self {
            Self::Assign => "=".to_owned(),
            Self::Compound(op) => format!("{}=", op.as_symbol()),
        }
    }
}

/// `++` or `--`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

impl UpdateOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Increment => "++",
            Self::Decrement => "--",
        }
    }

    pub fn from_symbol(text: &str) -> Option<Self> {
        match text {
            "++" => Some(Self::Increment),
            "--" => Some(Self::Decrement),
            _ => None,
        }
    }

    /// The binary operator applied with an operand of one.
    pub const fn step(self) -> BinaryOp {
        match self {
            Self::Increment => BinaryOp::Add,
            Self::Decrement => BinaryOp::Sub,
        }
    }
}
