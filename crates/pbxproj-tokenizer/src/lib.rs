//! A tokenizer for Xcode project files (`project.pbxproj`)

mod span;
pub use span::Span;

mod token;
pub use token::{Quote, Token, TokenKind};

mod tokenizer;
pub use tokenizer::{Tokenizer, is_bare_atom_char};

mod error;
pub use error::{SyntaxError, SyntaxErrorKind};

mod lexer;
pub use lexer::{Atom, Comment, CommentStyle, Lexeme, Lexer};
