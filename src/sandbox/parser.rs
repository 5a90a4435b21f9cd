//! Recursive-descent parser for the JavaScript/JSX subset.
//!
//! Plain expression grammar is parsed off the token stream; JSX positions
//! (tag names, attributes, text children) switch to raw character scanning
//! because their lexical rules differ from the surrounding language.

use std::rc::Rc;

use super::ast::{
    ArrayElement, DeclKind, Expr, FunctionBody, FunctionLiteral, JsxAttr, JsxChild, JsxElement,
    JsxName, ObjectPatternProp, ObjectProp, Param, Pattern, Stmt, TemplatePart,
};
use super::token::{ParseError, TokenKind, TokenStream, unescape};

/// Parse a transformed snippet body into a statement list.
pub fn parse(source: &str) -> Result<Vec<Stmt>, ParseError> {
    let mut parser = Parser::new(source);
    parser.parse_program()
}

/// Parse a standalone expression (template interpolations re-enter here).
fn parse_expression_source(source: &str) -> Result<Expr, ParseError> {
    let mut parser = Parser::new(source);
    let expr = parser.parse_expression()?;
    if let Some(tok) = parser.tokens.peek()? {
        return Err(parser
            .tokens
            .error(format!("unexpected '{}' after expression", tok.text)));
    }
    Ok(expr)
}

struct Parser<'src> {
    tokens: TokenStream<'src>,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            tokens: TokenStream::new(source),
        }
    }

    fn parse_program(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut stmts = Vec::new();
        while self.tokens.peek()?.is_some() {
            if self.tokens.eat(TokenKind::Semi)? {
                continue;
            }
            stmts.push(self.parse_statement()?);
        }
        Ok(stmts)
    }

    // ========== Statements ==========

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let Some(tok) = self.tokens.peek()? else {
            return Err(self.tokens.error("expected a statement"));
        };
        let stmt = match tok.kind {
            TokenKind::Const | TokenKind::Let | TokenKind::Var => self.parse_declaration()?,
            TokenKind::Function => self.parse_function_declaration()?,
            TokenKind::Return => {
                self.tokens.next()?;
                let value = match self.tokens.peek_kind()? {
                    None | Some(TokenKind::Semi) | Some(TokenKind::RBrace) => None,
                    _ => Some(self.parse_expression()?),
                };
                Stmt::Return(value)
            }
            TokenKind::If => self.parse_if()?,
            TokenKind::While => self.parse_while()?,
            TokenKind::LBrace => Stmt::Block(self.parse_block()?),
            _ => Stmt::Expr(self.parse_expression()?),
        };
        while self.tokens.eat(TokenKind::Semi)? {}
        Ok(stmt)
    }

    fn parse_declaration(&mut self) -> Result<Stmt, ParseError> {
        let kind = match self.tokens.next()?.map(|tok| tok.kind) {
            Some(TokenKind::Const) => DeclKind::Const,
            Some(TokenKind::Let) => DeclKind::Let,
            _ => DeclKind::Var,
        };
        let pattern = self.parse_pattern()?;
        let init = if self.tokens.eat(TokenKind::Assign)? {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(Stmt::Declaration {
            kind,
            pattern,
            init,
        })
    }

    fn parse_function_declaration(&mut self) -> Result<Stmt, ParseError> {
        self.tokens.expect(TokenKind::Function)?;
        let name = self.expect_name()?;
        let params = self.parse_function_params()?;
        let body = FunctionBody::Block(self.parse_block()?);
        Ok(Stmt::Function {
            name: name.clone(),
            function: Rc::new(FunctionLiteral {
                name: Some(name),
                params,
                body,
            }),
        })
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        self.tokens.expect(TokenKind::If)?;
        self.tokens.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.tokens.expect(TokenKind::RParen)?;
        let then_branch = self.parse_branch()?;
        let else_branch = if self.tokens.eat(TokenKind::Else)? {
            if self.tokens.peek_kind()? == Some(TokenKind::If) {
                Some(vec![self.parse_if()?])
            } else {
                Some(self.parse_branch()?)
            }
        } else {
            None
        };
        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        self.tokens.expect(TokenKind::While)?;
        self.tokens.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.tokens.expect(TokenKind::RParen)?;
        let body = self.parse_branch()?;
        Ok(Stmt::While { condition, body })
    }

    fn parse_branch(&mut self) -> Result<Vec<Stmt>, ParseError> {
        if self.tokens.peek_kind()? == Some(TokenKind::LBrace) {
            self.parse_block()
        } else {
            Ok(vec![self.parse_statement()?])
        }
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.tokens.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while self.tokens.peek_kind()? != Some(TokenKind::RBrace) {
            if self.tokens.peek()?.is_none() {
                return Err(self.tokens.error("unclosed block"));
            }
            if self.tokens.eat(TokenKind::Semi)? {
                continue;
            }
            stmts.push(self.parse_statement()?);
        }
        self.tokens.expect(TokenKind::RBrace)?;
        Ok(stmts)
    }

    // ========== Patterns ==========

    fn parse_pattern(&mut self) -> Result<Pattern, ParseError> {
        match self.tokens.peek_kind()? {
            Some(TokenKind::LBracket) => {
                self.tokens.next()?;
                let mut elements = Vec::new();
                while self.tokens.peek_kind()? != Some(TokenKind::RBracket) {
                    elements.push(self.parse_pattern()?);
                    if !self.tokens.eat(TokenKind::Comma)? {
                        break;
                    }
                }
                self.tokens.expect(TokenKind::RBracket)?;
                Ok(Pattern::Array(elements))
            }
            Some(TokenKind::LBrace) => {
                self.tokens.next()?;
                let mut props = Vec::new();
                while self.tokens.peek_kind()? != Some(TokenKind::RBrace) {
                    let key = self.expect_name()?;
                    let binding = if self.tokens.eat(TokenKind::Colon)? {
                        self.expect_name()?
                    } else {
                        key.clone()
                    };
                    let default = if self.tokens.eat(TokenKind::Assign)? {
                        Some(self.parse_assignment()?)
                    } else {
                        None
                    };
                    props.push(ObjectPatternProp {
                        key,
                        binding,
                        default,
                    });
                    if !self.tokens.eat(TokenKind::Comma)? {
                        break;
                    }
                }
                self.tokens.expect(TokenKind::RBrace)?;
                Ok(Pattern::Object(props))
            }
            _ => Ok(Pattern::Ident(self.expect_name()?)),
        }
    }

    fn expect_name(&mut self) -> Result<String, ParseError> {
        match self.tokens.next()? {
            Some(tok) if tok.kind.is_name_like() => Ok(tok.text.to_string()),
            Some(tok) => Err(self
                .tokens
                .error(format!("expected a name, found '{}'", tok.text))),
            None => Err(self.tokens.error("expected a name, found end of input")),
        }
    }

    // ========== Expressions ==========

    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_conditional()?;
        let op = match self.tokens.peek_kind()? {
            Some(TokenKind::Assign) => super::ast::AssignOp::Assign,
            Some(TokenKind::PlusAssign) => super::ast::AssignOp::AddAssign,
            Some(TokenKind::MinusAssign) => super::ast::AssignOp::SubAssign,
            _ => return Ok(expr),
        };
        if !matches!(expr, Expr::Ident(_) | Expr::Member { .. } | Expr::Index { .. }) {
            return Err(self.tokens.error("invalid assignment target"));
        }
        self.tokens.next()?;
        let value = self.parse_assignment()?;
        Ok(Expr::Assign {
            op,
            target: Box::new(expr),
            value: Box::new(value),
        })
    }

    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let condition = self.parse_nullish()?;
        if !self.tokens.eat(TokenKind::Question)? {
            return Ok(condition);
        }
        let then_expr = self.parse_assignment()?;
        self.tokens.expect(TokenKind::Colon)?;
        let else_expr = self.parse_assignment()?;
        Ok(Expr::Conditional {
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        })
    }

    fn parse_nullish(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_or()?;
        while self.tokens.eat(TokenKind::Nullish)? {
            let right = self.parse_or()?;
            left = Expr::Logical {
                op: super::ast::LogicalOp::Nullish,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.tokens.eat(TokenKind::OrOr)? {
            let right = self.parse_and()?;
            left = Expr::Logical {
                op: super::ast::LogicalOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;
        while self.tokens.eat(TokenKind::AndAnd)? {
            let right = self.parse_equality()?;
            left = Expr::Logical {
                op: super::ast::LogicalOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        use super::ast::BinaryOp;
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.tokens.peek_kind()? {
                Some(TokenKind::Eq) => BinaryOp::Eq,
                Some(TokenKind::Ne) => BinaryOp::Ne,
                Some(TokenKind::StrictEq) => BinaryOp::StrictEq,
                Some(TokenKind::StrictNe) => BinaryOp::StrictNe,
                _ => break,
            };
            self.tokens.next()?;
            let right = self.parse_relational()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        use super::ast::BinaryOp;
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.tokens.peek_kind()? {
                Some(TokenKind::Lt) => BinaryOp::Lt,
                Some(TokenKind::Le) => BinaryOp::Le,
                Some(TokenKind::Gt) => BinaryOp::Gt,
                Some(TokenKind::Ge) => BinaryOp::Ge,
                _ => break,
            };
            self.tokens.next()?;
            let right = self.parse_additive()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        use super::ast::BinaryOp;
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.tokens.peek_kind()? {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.tokens.next()?;
            let right = self.parse_multiplicative()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        use super::ast::BinaryOp;
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.tokens.peek_kind()? {
                Some(TokenKind::Star) => BinaryOp::Mul,
                Some(TokenKind::Slash) => BinaryOp::Div,
                Some(TokenKind::Percent) => BinaryOp::Rem,
                _ => break,
            };
            self.tokens.next()?;
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        use super::ast::UnaryOp;
        let op = match self.tokens.peek_kind()? {
            Some(TokenKind::Bang) => Some(UnaryOp::Not),
            Some(TokenKind::Minus) => Some(UnaryOp::Neg),
            Some(TokenKind::Typeof) => Some(UnaryOp::Typeof),
            _ => None,
        };
        if let Some(op) = op {
            self.tokens.next()?;
            let expr = self.parse_unary()?;
            return Ok(Expr::Unary {
                op,
                expr: Box::new(expr),
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.tokens.peek_kind()? {
                Some(TokenKind::Dot) => {
                    self.tokens.next()?;
                    let property = self.expect_name()?;
                    expr = Expr::Member {
                        object: Box::new(expr),
                        property,
                        optional: false,
                    };
                }
                Some(TokenKind::OptChain) => {
                    self.tokens.next()?;
                    let property = self.expect_name()?;
                    expr = Expr::Member {
                        object: Box::new(expr),
                        property,
                        optional: true,
                    };
                }
                Some(TokenKind::LParen) => {
                    let args = self.parse_arguments()?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                    };
                }
                Some(TokenKind::LBracket) => {
                    self.tokens.next()?;
                    let index = self.parse_expression()?;
                    self.tokens.expect(TokenKind::RBracket)?;
                    expr = Expr::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.tokens.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        while self.tokens.peek_kind()? != Some(TokenKind::RParen) {
            args.push(self.parse_assignment()?);
            if !self.tokens.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.tokens.expect(TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let Some(tok) = self.tokens.peek()? else {
            return Err(self.tokens.error("expected an expression"));
        };
        match tok.kind {
            TokenKind::Number => {
                let tok = self.tokens.expect(TokenKind::Number)?;
                let value = tok
                    .text
                    .parse::<f64>()
                    .map_err(|_| self.tokens.error(format!("invalid number '{}'", tok.text)))?;
                Ok(Expr::Number(value))
            }
            TokenKind::DoubleString | TokenKind::SingleString => {
                self.tokens.next()?;
                Ok(Expr::Str(unescape(&tok.text[1..tok.text.len() - 1])))
            }
            TokenKind::Template => {
                self.tokens.next()?;
                self.parse_template(tok.text)
            }
            TokenKind::True => {
                self.tokens.next()?;
                Ok(Expr::Bool(true))
            }
            TokenKind::False => {
                self.tokens.next()?;
                Ok(Expr::Bool(false))
            }
            TokenKind::Null => {
                self.tokens.next()?;
                Ok(Expr::Null)
            }
            TokenKind::Undefined => {
                self.tokens.next()?;
                Ok(Expr::Undefined)
            }
            TokenKind::Ident => {
                self.tokens.next()?;
                if self.tokens.peek_kind()? == Some(TokenKind::FatArrow) {
                    self.tokens.next()?;
                    let body = self.parse_arrow_body()?;
                    return Ok(Expr::Function(Rc::new(FunctionLiteral {
                        name: None,
                        params: vec![Param {
                            pattern: Pattern::Ident(tok.text.to_string()),
                            default: None,
                        }],
                        body,
                    })));
                }
                Ok(Expr::Ident(tok.text.to_string()))
            }
            TokenKind::Function => {
                self.tokens.next()?;
                let name = if self.tokens.peek_kind()? == Some(TokenKind::LParen) {
                    None
                } else {
                    Some(self.expect_name()?)
                };
                let params = self.parse_function_params()?;
                let body = FunctionBody::Block(self.parse_block()?);
                Ok(Expr::Function(Rc::new(FunctionLiteral {
                    name,
                    params,
                    body,
                })))
            }
            TokenKind::LParen => self.parse_paren_or_arrow(),
            TokenKind::LBracket => self.parse_array(),
            TokenKind::LBrace => self.parse_object(),
            TokenKind::Lt => {
                self.tokens.next()?;
                Ok(Expr::Jsx(self.parse_jsx_after_lt()?))
            }
            _ => Err(self
                .tokens
                .error(format!("unexpected token '{}'", tok.text))),
        }
    }

    fn parse_function_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.tokens.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        while self.tokens.peek_kind()? != Some(TokenKind::RParen) {
            let pattern = self.parse_pattern()?;
            let default = if self.tokens.eat(TokenKind::Assign)? {
                Some(self.parse_assignment()?)
            } else {
                None
            };
            params.push(Param { pattern, default });
            if !self.tokens.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.tokens.expect(TokenKind::RParen)?;
        Ok(params)
    }

    /// Disambiguate `(a, b) => …` from a parenthesized expression by
    /// speculatively parsing a parameter list up to `=>`; once the arrow is
    /// seen the parse is committed, so body errors propagate as-is.
    fn parse_paren_or_arrow(&mut self) -> Result<Expr, ParseError> {
        let checkpoint = self.tokens.clone();
        match self.try_parse_arrow_params() {
            Ok(params) => {
                let body = self.parse_arrow_body()?;
                Ok(Expr::Function(Rc::new(FunctionLiteral {
                    name: None,
                    params,
                    body,
                })))
            }
            Err(_) => {
                self.tokens = checkpoint;
                self.tokens.expect(TokenKind::LParen)?;
                let expr = self.parse_expression()?;
                self.tokens.expect(TokenKind::RParen)?;
                Ok(expr)
            }
        }
    }

    fn try_parse_arrow_params(&mut self) -> Result<Vec<Param>, ParseError> {
        let params = self.parse_function_params()?;
        self.tokens.expect(TokenKind::FatArrow)?;
        Ok(params)
    }

    fn parse_arrow_body(&mut self) -> Result<FunctionBody, ParseError> {
        if self.tokens.peek_kind()? == Some(TokenKind::LBrace) {
            Ok(FunctionBody::Block(self.parse_block()?))
        } else {
            Ok(FunctionBody::Expr(Box::new(self.parse_assignment()?)))
        }
    }

    fn parse_array(&mut self) -> Result<Expr, ParseError> {
        self.tokens.expect(TokenKind::LBracket)?;
        let mut elements = Vec::new();
        while self.tokens.peek_kind()? != Some(TokenKind::RBracket) {
            if self.tokens.eat(TokenKind::Ellipsis)? {
                elements.push(ArrayElement::Spread(self.parse_assignment()?));
            } else {
                elements.push(ArrayElement::Item(self.parse_assignment()?));
            }
            if !self.tokens.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.tokens.expect(TokenKind::RBracket)?;
        Ok(Expr::Array(elements))
    }

    fn parse_object(&mut self) -> Result<Expr, ParseError> {
        self.tokens.expect(TokenKind::LBrace)?;
        let mut props = Vec::new();
        while self.tokens.peek_kind()? != Some(TokenKind::RBrace) {
            if self.tokens.eat(TokenKind::Ellipsis)? {
                props.push(ObjectProp::Spread(self.parse_assignment()?));
            } else {
                let Some(tok) = self.tokens.next()? else {
                    return Err(self.tokens.error("unclosed object literal"));
                };
                let key = match tok.kind {
                    kind if kind.is_name_like() => tok.text.to_string(),
                    TokenKind::DoubleString | TokenKind::SingleString => {
                        unescape(&tok.text[1..tok.text.len() - 1])
                    }
                    TokenKind::Number => tok.text.to_string(),
                    _ => {
                        return Err(self
                            .tokens
                            .error(format!("unexpected object key '{}'", tok.text)));
                    }
                };
                if self.tokens.eat(TokenKind::Colon)? {
                    let value = self.parse_assignment()?;
                    props.push(ObjectProp::Entry { key, value });
                } else {
                    props.push(ObjectProp::Shorthand(key));
                }
            }
            if !self.tokens.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.tokens.expect(TokenKind::RBrace)?;
        Ok(Expr::Object(props))
    }

    fn parse_template(&mut self, raw: &str) -> Result<Expr, ParseError> {
        let inner = &raw[1..raw.len() - 1];
        let mut parts = Vec::new();
        let mut buf = String::new();
        let mut i = 0;
        while i < inner.len() {
            let Some(c) = inner[i..].chars().next() else {
                break;
            };
            if c == '\\' {
                match inner[i + 1..].chars().next() {
                    Some(escaped) => {
                        buf.push(match escaped {
                            'n' => '\n',
                            't' => '\t',
                            'r' => '\r',
                            '0' => '\0',
                            other => other,
                        });
                        i += 1 + escaped.len_utf8();
                    }
                    None => {
                        buf.push('\\');
                        i += 1;
                    }
                }
            } else if c == '$' && inner[i + 1..].starts_with('{') {
                let start = i + 2;
                let mut depth = 1usize;
                let mut j = start;
                while j < inner.len() {
                    let Some(cj) = inner[j..].chars().next() else {
                        break;
                    };
                    match cj {
                        '{' => depth += 1,
                        '}' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                    j += cj.len_utf8();
                }
                if depth != 0 {
                    return Err(self.tokens.error("unterminated template interpolation"));
                }
                if !buf.is_empty() {
                    parts.push(TemplatePart::Str(std::mem::take(&mut buf)));
                }
                let expr = parse_expression_source(&inner[start..j])?;
                parts.push(TemplatePart::Expr(Box::new(expr)));
                i = j + 1;
            } else {
                buf.push(c);
                i += c.len_utf8();
            }
        }
        if !buf.is_empty() {
            parts.push(TemplatePart::Str(buf));
        }
        Ok(Expr::Template(parts))
    }

    // ========== JSX ==========

    /// Parse an element whose opening `<` was just consumed as a token.
    fn parse_jsx_after_lt(&mut self) -> Result<JsxElement, ParseError> {
        self.tokens.raw_skip_ws()?;
        if self.tokens.raw_eat_char('>')? {
            let children = self.parse_jsx_children(None)?;
            return Ok(JsxElement {
                name: JsxName::Fragment,
                attrs: vec![],
                children,
            });
        }
        let name = match self.tokens.raw_name(false)? {
            Some(name) => name.to_string(),
            None => return Err(self.tokens.error("expected a JSX tag name")),
        };
        let mut attrs = Vec::new();
        loop {
            self.tokens.raw_skip_ws()?;
            match self.tokens.raw_peek_char()? {
                Some('/') => {
                    self.tokens.raw_eat_char('/')?;
                    self.tokens.raw_expect_char('>')?;
                    return Ok(JsxElement {
                        name: JsxName::Tag(name),
                        attrs,
                        children: vec![],
                    });
                }
                Some('>') => {
                    self.tokens.raw_eat_char('>')?;
                    break;
                }
                Some('{') => {
                    self.tokens.raw_eat_char('{')?;
                    self.tokens.expect(TokenKind::Ellipsis)?;
                    let expr = self.parse_assignment()?;
                    self.tokens.expect(TokenKind::RBrace)?;
                    attrs.push(JsxAttr::Spread(expr));
                }
                Some(_) => {
                    let attr_name = match self.tokens.raw_name(true)? {
                        Some(name) => name.to_string(),
                        None => return Err(self.tokens.error("expected a JSX attribute name")),
                    };
                    self.tokens.raw_skip_ws()?;
                    let value = if self.tokens.raw_eat_char('=')? {
                        self.tokens.raw_skip_ws()?;
                        match self.tokens.raw_peek_char()? {
                            Some('"' | '\'') => Expr::Str(self.tokens.raw_string()?),
                            Some('{') => {
                                self.tokens.raw_eat_char('{')?;
                                let expr = self.parse_assignment()?;
                                self.tokens.expect(TokenKind::RBrace)?;
                                expr
                            }
                            _ => {
                                return Err(self.tokens.error(format!(
                                    "expected a value for JSX attribute '{attr_name}'"
                                )));
                            }
                        }
                    } else {
                        Expr::Bool(true)
                    };
                    attrs.push(JsxAttr::Named {
                        name: attr_name,
                        value,
                    });
                }
                None => return Err(self.tokens.error("unclosed JSX element")),
            }
        }
        let children = self.parse_jsx_children(Some(&name))?;
        Ok(JsxElement {
            name: JsxName::Tag(name),
            attrs,
            children,
        })
    }

    /// Parse children until the matching closing tag (`None` = fragment).
    fn parse_jsx_children(&mut self, closing: Option<&str>) -> Result<Vec<JsxChild>, ParseError> {
        let mut children = Vec::new();
        loop {
            let text = self.tokens.jsx_text()?;
            if let Some(text) = collapse_jsx_text(text) {
                children.push(JsxChild::Text(text));
            }
            if self.tokens.raw_eat_char('{')? {
                // {} and {/* comment */} contribute nothing
                if self.tokens.peek_kind()? == Some(TokenKind::RBrace) {
                    self.tokens.next()?;
                    continue;
                }
                let expr = self.parse_assignment()?;
                self.tokens.expect(TokenKind::RBrace)?;
                children.push(JsxChild::Expr(expr));
                continue;
            }
            self.tokens.raw_expect_char('<')?;
            self.tokens.raw_skip_ws()?;
            if self.tokens.raw_eat_char('/')? {
                self.tokens.raw_skip_ws()?;
                let close_name = self.tokens.raw_name(false)?.map(str::to_string);
                self.tokens.raw_skip_ws()?;
                self.tokens.raw_expect_char('>')?;
                let matched = match (closing, close_name.as_deref()) {
                    (Some(open), Some(close)) => open == close,
                    (None, None) => true,
                    _ => false,
                };
                if !matched {
                    return Err(self.tokens.error(format!(
                        "mismatched JSX closing tag </{}>",
                        close_name.as_deref().unwrap_or("")
                    )));
                }
                return Ok(children);
            }
            children.push(JsxChild::Element(self.parse_jsx_after_lt()?));
        }
    }
}

/// JSX whitespace handling: text lines are joined, whitespace runs collapse
/// to a single space, and newline-adjacent leading/trailing whitespace is
/// dropped.
fn collapse_jsx_text(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }
    let leading = &text[..text.len() - text.trim_start().len()];
    let trailing = &text[text.trim_end().len()..];
    let mut out = String::new();
    if !leading.is_empty() && !leading.contains('\n') {
        out.push(' ');
    }
    let mut last_was_ws = false;
    for c in text.trim().chars() {
        if c.is_whitespace() {
            if !last_was_ws {
                out.push(' ');
            }
            last_was_ws = true;
        } else {
            out.push(c);
            last_was_ws = false;
        }
    }
    if !trailing.is_empty() && !trailing.contains('\n') {
        out.push(' ');
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::super::ast::*;
    use super::*;

    fn parse_one(source: &str) -> Stmt {
        let mut stmts = parse(source).unwrap();
        assert_eq!(stmts.len(), 1, "expected one statement in {source:?}");
        stmts.remove(0)
    }

    fn parse_expr(source: &str) -> Expr {
        match parse_one(source) {
            Stmt::Expr(expr) => expr,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn parses_destructuring_declaration() {
        let stmt = parse_one("const [count, setCount] = useState(0)");
        let Stmt::Declaration { kind, pattern, init } = stmt else {
            panic!("expected declaration");
        };
        assert_eq!(kind, DeclKind::Const);
        assert_eq!(
            pattern,
            Pattern::Array(vec![
                Pattern::Ident("count".into()),
                Pattern::Ident("setCount".into()),
            ])
        );
        assert!(matches!(init, Some(Expr::Call { .. })));
    }

    #[test]
    fn parses_object_pattern_with_rename_and_default() {
        let stmt = parse_one("const { title: heading, size = 2 } = props");
        let Stmt::Declaration { pattern, .. } = stmt else {
            panic!("expected declaration");
        };
        let Pattern::Object(props) = pattern else {
            panic!("expected object pattern");
        };
        assert_eq!(props[0].key, "title");
        assert_eq!(props[0].binding, "heading");
        assert_eq!(props[1].key, "size");
        assert!(props[1].default.is_some());
    }

    #[test]
    fn parses_arrow_functions_both_shapes() {
        assert!(matches!(parse_expr("x => x + 1"), Expr::Function(_)));
        let expr = parse_expr("(a, b) => { return a }");
        let Expr::Function(function) = expr else {
            panic!("expected function");
        };
        assert_eq!(function.params.len(), 2);
        assert!(matches!(function.body, FunctionBody::Block(_)));
    }

    #[test]
    fn parenthesized_expression_is_not_an_arrow() {
        assert!(matches!(parse_expr("(1 + 2) * 3"), Expr::Binary { .. }));
    }

    #[test]
    fn parses_conditional_and_logical_chains() {
        let expr = parse_expr("loading ? a : b || c");
        assert!(matches!(expr, Expr::Conditional { .. }));
    }

    #[test]
    fn parses_template_with_interpolation() {
        let expr = parse_expr("`count: ${count + 1}!`");
        let Expr::Template(parts) = expr else {
            panic!("expected template");
        };
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], TemplatePart::Str("count: ".into()));
        assert!(matches!(parts[1], TemplatePart::Expr(_)));
        assert_eq!(parts[2], TemplatePart::Str("!".into()));
    }

    #[test]
    fn parses_jsx_element_with_attributes_and_children() {
        let expr = parse_expr(r#"<Button variant="ghost" onClick={handle} disabled>Hi</Button>"#);
        let Expr::Jsx(element) = expr else {
            panic!("expected JSX");
        };
        assert_eq!(element.name, JsxName::Tag("Button".into()));
        assert_eq!(element.attrs.len(), 3);
        assert!(matches!(
            &element.attrs[2],
            JsxAttr::Named { name, value: Expr::Bool(true) } if name == "disabled"
        ));
        assert_eq!(element.children, vec![JsxChild::Text("Hi".into())]);
    }

    #[test]
    fn parses_nested_jsx_with_expression_children() {
        let expr = parse_expr("<div className=\"row\">\n  <span>{count}</span>\n</div>");
        let Expr::Jsx(element) = expr else {
            panic!("expected JSX");
        };
        assert_eq!(element.children.len(), 1);
        let JsxChild::Element(span) = &element.children[0] else {
            panic!("expected element child");
        };
        assert!(matches!(span.children[0], JsxChild::Expr(_)));
    }

    #[test]
    fn parses_fragment_and_self_closing() {
        let expr = parse_expr("<><Spinner />{body}</>");
        let Expr::Jsx(element) = expr else {
            panic!("expected JSX");
        };
        assert_eq!(element.name, JsxName::Fragment);
        assert_eq!(element.children.len(), 2);
    }

    #[test]
    fn parses_jsx_spread_and_dashed_attributes() {
        let expr = parse_expr(r#"<div {...rest} data-state="open" />"#);
        let Expr::Jsx(element) = expr else {
            panic!("expected JSX");
        };
        assert!(matches!(element.attrs[0], JsxAttr::Spread(_)));
        assert!(matches!(
            &element.attrs[1],
            JsxAttr::Named { name, .. } if name == "data-state"
        ));
    }

    #[test]
    fn jsx_comment_children_are_dropped() {
        let expr = parse_expr("<div>{/* note */}text</div>");
        let Expr::Jsx(element) = expr else {
            panic!("expected JSX");
        };
        assert_eq!(element.children, vec![JsxChild::Text("text".into())]);
    }

    #[test]
    fn reports_mismatched_closing_tag() {
        let err = parse("<div>text</span>").unwrap_err();
        assert!(err.message.contains("mismatched"), "{}", err.message);
    }

    #[test]
    fn reports_error_with_position_for_malformed_input() {
        let err = parse("export default function( { return <").unwrap_err();
        assert!(!err.message.is_empty());
    }

    #[test]
    fn parses_function_declaration_and_return() {
        let stmts = parse("function App() { return <div /> }\nreturn App").unwrap();
        assert_eq!(stmts.len(), 2);
        assert!(matches!(stmts[0], Stmt::Function { .. }));
        assert!(matches!(stmts[1], Stmt::Return(Some(Expr::Ident(_)))));
    }

    #[test]
    fn semicolons_are_optional() {
        let stmts = parse("const a = 1\nconst b = 2;;\na + b").unwrap();
        assert_eq!(stmts.len(), 3);
    }

    #[test]
    fn collapse_drops_newline_indentation_but_keeps_inline_spaces() {
        assert_eq!(collapse_jsx_text("\n  "), None);
        assert_eq!(collapse_jsx_text("Count: "), Some("Count: ".into()));
        assert_eq!(collapse_jsx_text("\n  Hello\n  "), Some("Hello".into()));
        assert_eq!(collapse_jsx_text("a  b"), Some("a b".into()));
    }
}
