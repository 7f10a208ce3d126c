//! `for` block that binds loop items by reference.
//!
//! liquid's own `for` copies every item into a `liquid::model::Value`, which
//! loses the case-insensitive lookups of the value tree. This block keeps the
//! items as views, so `item.title` still finds a `Title` field.

use liquid_core::model::{KString, KStringRef, Object, ScalarCow, Value, ValueCow, ValueView};
use liquid_core::parser::{BlockElement, TryMatchToken};
use liquid_core::runtime::{Interrupt, InterruptRegister, StackFrame};
use liquid_core::{BlockReflection, ParseBlock, TagBlock, TagTokenIter};
use liquid_core::{Error, Expression, Language, Renderable, Result, Runtime, Template};
use std::collections::HashMap;
use std::io::Write;

const FORLOOP: &str = "forloop";

#[derive(Copy, Clone, Debug, Default)]
pub struct ForBlock;

impl BlockReflection for ForBlock {
    fn start_tag(&self) -> &str {
        "for"
    }

    fn end_tag(&self) -> &str {
        "endfor"
    }

    fn description(&self) -> &str {
        "Repeats a block for each item of an array, object or range."
    }
}

impl ParseBlock for ForBlock {
    fn parse(
        &self,
        mut arguments: TagTokenIter<'_>,
        mut tokens: TagBlock<'_, '_>,
        options: &Language,
    ) -> Result<Box<dyn Renderable>> {
        let var_name = arguments
            .expect_next("Identifier expected.")?
            .expect_identifier()
            .into_result()?;
        let var_name = KString::from_ref(var_name);

        arguments
            .expect_next("\"in\" expected.")?
            .expect_str("in")
            .into_result_custom_msg("\"in\" expected.")?;

        let range = arguments.expect_next("Array or range expected.")?;
        let range = match range.expect_value() {
            TryMatchToken::Matches(items) => LoopRange::Items(items),
            TryMatchToken::Fails(range) => match range.expect_range() {
                TryMatchToken::Matches((start, stop)) => LoopRange::Counted(start, stop),
                TryMatchToken::Fails(range) => return range.raise_error().into_err(),
            },
        };

        let mut limit = None;
        let mut offset = None;
        let mut reversed = false;
        while let Some(token) = arguments.next() {
            let token = match token.expect_str("reversed") {
                TryMatchToken::Matches(_) => {
                    reversed = true;
                    continue;
                }
                TryMatchToken::Fails(token) => token,
            };
            let key = token.expect_identifier().into_result()?;
            arguments
                .expect_next("\":\" expected.")?
                .expect_str(":")
                .into_result_custom_msg("\":\" expected.")?;
            let value = arguments
                .expect_next("Value expected.")?
                .expect_value()
                .into_result()?;
            match key {
                "limit" => limit = Some(value),
                "offset" => offset = Some(value),
                other => {
                    return Err(Error::with_msg(format!(
                        "Unknown for loop attribute \"{other}\""
                    )))
                }
            }
        }

        let mut body = Vec::new();
        let mut otherwise = None;
        while let Some(element) = tokens.next()? {
            match element {
                BlockElement::Tag(mut tag) => match tag.name() {
                    "else" => {
                        tag.tokens().expect_nothing()?;
                        otherwise = Some(tokens.parse_all(options)?);
                        break;
                    }
                    _ => body.push(tag.parse(&mut tokens, options)?),
                },
                element => body.push(element.parse(&mut tokens, options)?),
            }
        }
        tokens.assert_empty();

        Ok(Box::new(ForLoop {
            var_name,
            range,
            limit,
            offset,
            reversed,
            body: Template::new(body),
            otherwise: otherwise.map(Template::new),
        }))
    }

    fn reflection(&self) -> &dyn BlockReflection {
        self
    }
}

#[derive(Debug)]
enum LoopRange {
    Items(Expression),
    Counted(Expression, Expression),
}

#[derive(Debug)]
struct ForLoop {
    var_name: KString,
    range: LoopRange,
    limit: Option<Expression>,
    offset: Option<Expression>,
    reversed: bool,
    body: Template,
    otherwise: Option<Template>,
}

impl Renderable for ForLoop {
    fn render_to(&self, writer: &mut dyn Write, runtime: &dyn Runtime) -> Result<()> {
        let evaluated;
        let mut items = match &self.range {
            LoopRange::Items(expression) => {
                evaluated = expression.evaluate(runtime)?;
                loop_items(evaluated.as_view())?
            }
            LoopRange::Counted(start, stop) => {
                let start = evaluate_integer(start, runtime, "range start")?;
                let stop = evaluate_integer(stop, runtime, "range end")?;
                (start..=stop)
                    .map(|i| ValueCow::Owned(Value::scalar(i)))
                    .collect()
            }
        };

        let offset = match &self.offset {
            Some(offset) => evaluate_integer(offset, runtime, "offset")?.max(0) as usize,
            None => 0,
        };
        items.drain(..offset.min(items.len()));
        if let Some(limit) = &self.limit {
            items.truncate(evaluate_integer(limit, runtime, "limit")?.max(0) as usize);
        }
        if self.reversed {
            items.reverse();
        }

        if items.is_empty() {
            if let Some(otherwise) = &self.otherwise {
                otherwise.render_to(writer, runtime)?;
            }
            return Ok(());
        }

        let parentloop = runtime
            .try_get(&[ScalarCow::new(FORLOOP)])
            .map(|parent| parent.as_view().to_value());
        let length = items.len();
        for (index, item) in items.iter().enumerate() {
            let forloop = forloop_object(index, length, parentloop.as_ref());
            let mut frame = HashMap::<KStringRef<'_>, &dyn ValueView>::new();
            frame.insert(KStringRef::from_static(FORLOOP), &forloop);
            frame.insert(KStringRef::from_ref(self.var_name.as_str()), item.as_view());

            let scope = StackFrame::new(runtime, &frame);
            self.body.render_to(writer, &scope)?;

            let interrupt = scope.registers().get_mut::<InterruptRegister>().reset();
            if let Some(Interrupt::Break) = interrupt {
                break;
            }
        }
        Ok(())
    }
}

/// Arrays yield their items in place; objects yield `[key, value]` pairs.
fn loop_items(range: &dyn ValueView) -> Result<Vec<ValueCow<'_>>> {
    if let Some(array) = range.as_array() {
        Ok(array.values().map(ValueCow::Borrowed).collect())
    } else if let Some(object) = range.as_object() {
        Ok(object
            .iter()
            .map(|(key, value)| {
                ValueCow::Owned(Value::Array(vec![
                    Value::scalar(key.into_owned()),
                    value.to_value(),
                ]))
            })
            .collect())
    } else if range.is_nil() || range.is_state() {
        Ok(Vec::new())
    } else {
        Err(Error::with_msg(format!(
            "Cannot loop over a {}",
            range.type_name()
        )))
    }
}

fn evaluate_integer(expression: &Expression, runtime: &dyn Runtime, what: &str) -> Result<i64> {
    let value = expression.evaluate(runtime)?;
    let value = value.as_view();
    value
        .as_scalar()
        .and_then(|scalar| scalar.to_integer())
        .ok_or_else(|| {
            Error::with_msg(format!(
                "Expected a whole number for the loop {what}, got {}",
                value.type_name()
            ))
        })
}

fn forloop_object(index: usize, length: usize, parentloop: Option<&Value>) -> Object {
    let (index, length) = (index as i64, length as i64);
    let mut forloop = Object::new();
    forloop.insert("length".into(), Value::scalar(length));
    forloop.insert("index".into(), Value::scalar(index + 1));
    forloop.insert("index0".into(), Value::scalar(index));
    forloop.insert("rindex".into(), Value::scalar(length - index));
    forloop.insert("rindex0".into(), Value::scalar(length - index - 1));
    forloop.insert("first".into(), Value::scalar(index == 0));
    forloop.insert("last".into(), Value::scalar(index == length - 1));
    if let Some(parent) = parentloop {
        forloop.insert("parentloop".into(), parent.clone());
    }
    forloop
}
