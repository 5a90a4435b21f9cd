//! The stock capability map assembled for previews.
//!
//! Mirrors what the host hands generated components in place of real module
//! imports: React-style hook stubs, the `cn` class-name joiner, and
//! element-factory stubs for the UI primitives and icons the registry's
//! packages advertise. Hosts with richer components build their own map and
//! can still start from this one.

use std::collections::BTreeMap;

use super::CapabilityMap;
use super::eval::append_child_nodes;
use super::node::UiNode;
use super::value::{Invoker, Value};

/// UI primitives the preview recognises out of the box.
const UI_COMPONENTS: &[&str] = &[
    "Card",
    "CardContent",
    "CardHeader",
    "CardTitle",
    "Alert",
    "AlertDescription",
    "Badge",
    "Button",
    "Input",
    "Label",
    "Textarea",
    "Tabs",
    "TabsContent",
    "TabsList",
    "TabsTrigger",
    "ScrollArea",
    "Dialog",
    "DialogContent",
    "DialogHeader",
    "DialogTitle",
    "DialogTrigger",
];

/// Commonly generated icon names.
const ICONS: &[&str] = &[
    "ChevronDown",
    "ChevronUp",
    "ChevronLeft",
    "ChevronRight",
    "Plus",
    "Minus",
    "X",
    "Check",
    "Search",
    "Settings",
    "User",
    "Home",
    "Mail",
    "Phone",
    "Calendar",
    "Clock",
    "Star",
    "Heart",
    "ThumbsUp",
    "Share",
    "Download",
    "Upload",
    "Edit",
    "Trash",
    "Eye",
    "EyeOff",
    "Lock",
    "Unlock",
    "Bell",
    "Menu",
    "MoreHorizontal",
    "MoreVertical",
    "ArrowUp",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ExternalLink",
    "Copy",
    "Clipboard",
    "FileText",
    "Folder",
    "Image",
    "Video",
    "Music",
    "Code",
    "Terminal",
    "Database",
    "Server",
    "Globe",
    "Wifi",
    "Bluetooth",
    "Battery",
    "Zap",
    "Sun",
    "Moon",
    "Cloud",
    "Umbrella",
];

/// A component capability that renders as an element carrying the given tag.
///
/// Props pass through; `children` is unpacked into child nodes.
pub fn element_stub(tag: &str) -> Value {
    let tag = tag.to_string();
    Value::native(tag.clone(), move |_invoker: &mut dyn Invoker, args: &[Value]| {
        let mut props = match args.first() {
            Some(Value::Object(map)) => map.borrow().clone(),
            _ => BTreeMap::new(),
        };
        let mut children = Vec::new();
        if let Some(child_value) = props.remove("children") {
            append_child_nodes(&child_value, &mut children);
        }
        Ok(Value::Node(UiNode::element(tag.clone(), props, children)))
    })
}

/// The full stock map: hooks, `cn`, UI primitives, icons.
pub fn component_library() -> CapabilityMap {
    let mut library = CapabilityMap::new();

    library.insert(
        "useState".to_string(),
        Value::native("useState", |invoker: &mut dyn Invoker, args: &[Value]| {
            let initial = match args.first() {
                // Lazy initializer form: useState(() => expensive())
                Some(f) if f.is_callable() => invoker.invoke(f, &[])?,
                Some(value) => value.clone(),
                None => Value::Undefined,
            };
            // The preview is a single render pass; the setter is inert.
            let setter = Value::native("setState", |_: &mut dyn Invoker, _: &[Value]| Ok(Value::Undefined));
            Ok(Value::array(vec![initial, setter]))
        }),
    );
    library.insert(
        "useEffect".to_string(),
        // Effects do not run in the single-pass preview.
        Value::native("useEffect", |_: &mut dyn Invoker, _: &[Value]| Ok(Value::Undefined)),
    );
    library.insert(
        "useMemo".to_string(),
        Value::native("useMemo", |invoker: &mut dyn Invoker, args: &[Value]| match args.first() {
            Some(f) if f.is_callable() => invoker.invoke(f, &[]),
            Some(value) => Ok(value.clone()),
            None => Ok(Value::Undefined),
        }),
    );
    library.insert(
        "useCallback".to_string(),
        Value::native("useCallback", |_: &mut dyn Invoker, args: &[Value]| {
            Ok(args.first().cloned().unwrap_or(Value::Undefined))
        }),
    );
    library.insert(
        "useRef".to_string(),
        Value::native("useRef", |_: &mut dyn Invoker, args: &[Value]| {
            let mut entries = BTreeMap::new();
            entries.insert(
                "current".to_string(),
                args.first().cloned().unwrap_or(Value::Undefined),
            );
            Ok(Value::object(entries))
        }),
    );
    library.insert(
        "cn".to_string(),
        Value::native("cn", |_: &mut dyn Invoker, args: &[Value]| {
            let classes: Vec<String> = args
                .iter()
                .filter(|arg| arg.truthy())
                .map(|arg| arg.to_string())
                .collect();
            Ok(Value::string(classes.join(" ")))
        }),
    );

    for name in UI_COMPONENTS.iter().chain(ICONS) {
        library.insert((*name).to_string(), element_stub(name));
    }

    library
}

#[cfg(test)]
mod tests {
    use super::super::{CapabilityMap, Renderer};
    use super::*;

    fn render(source: &str) -> String {
        match Renderer::new().render(source, &component_library()) {
            super::super::RenderOutcome::Success(node) => node.to_string(),
            super::super::RenderOutcome::Failure { message } => panic!("render failed: {message}"),
        }
    }

    #[test]
    fn library_contains_hooks_and_components() {
        let library = component_library();
        for name in ["useState", "useEffect", "cn", "Button", "Card", "Search"] {
            assert!(library.contains_key(name), "missing {name}");
        }
    }

    #[test]
    fn element_stub_renders_props_and_children() {
        let rendered = render("<Button variant=\"ghost\">Go</Button>");
        assert_eq!(rendered, "<Button variant=\"ghost\">Go</Button>");
    }

    #[test]
    fn use_state_returns_initial_value_and_inert_setter() {
        let rendered = render(
            "export default function Counter() { const [count, setCount] = useState(3); return <span>{count}</span> }",
        );
        assert_eq!(rendered, "<span>3</span>");
    }

    #[test]
    fn use_memo_evaluates_its_factory() {
        let rendered =
            render("export default function V() { const v = useMemo(() => 2 + 2); return <i>{v}</i> }");
        assert_eq!(rendered, "<i>4</i>");
    }

    #[test]
    fn cn_joins_truthy_classes() {
        let rendered = render(
            "export default function B() { return <div className={cn('a', false, 'b')} /> }",
        );
        assert_eq!(rendered, "<div className=\"a b\" />");
    }

    #[test]
    fn library_is_rebuilt_per_call() {
        let mut custom: CapabilityMap = component_library();
        custom.insert("Brand".to_string(), element_stub("Brand"));
        assert!(!component_library().contains_key("Brand"));
        assert!(custom.contains_key("Brand"));
    }
}
