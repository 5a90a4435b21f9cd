//! The built-in package database with detection patterns.

use super::PackageRecord;

fn record(name: &str, version: &str, description: &str, patterns: &[&str]) -> PackageRecord {
    PackageRecord {
        name: name.to_string(),
        version: version.to_string(),
        dev: false,
        description: description.to_string(),
        patterns: patterns.iter().map(ToString::to_string).collect(),
    }
}

fn dev_record(name: &str, version: &str, description: &str, patterns: &[&str]) -> PackageRecord {
    PackageRecord {
        dev: true,
        ..record(name, version, description, patterns)
    }
}

pub(crate) fn builtin_records() -> Vec<PackageRecord> {
    vec![
        // UI libraries
        record(
            "framer-motion",
            "^10.16.4",
            "Animation library for React",
            &[r"motion\.", "AnimatePresence", "useAnimation", "variants"],
        ),
        record(
            "react-spring",
            "^9.7.3",
            "Spring-physics based animations",
            &["useSpring", r"animated\.", "useTransition"],
        ),
        record(
            "recharts",
            "^2.8.0",
            "Composable charting library",
            &[
                "LineChart",
                "BarChart",
                "PieChart",
                "XAxis",
                "YAxis",
                "ResponsiveContainer",
            ],
        ),
        record(
            "react-hook-form",
            "^7.47.0",
            "Performant forms with easy validation",
            &["useForm", "Controller", "register", "handleSubmit"],
        ),
        record(
            "react-query",
            "^3.39.3",
            "Data fetching and caching library",
            &["useQuery", "useMutation", "QueryClient"],
        ),
        record(
            "@tanstack/react-query",
            "^5.0.0",
            "Powerful data synchronization for React",
            &["useQuery", "useMutation", "QueryClient"],
        ),
        record(
            "react-router-dom",
            "^6.17.0",
            "Declarative routing for React",
            &["BrowserRouter", "Route", "Link", "useNavigate", "useParams"],
        ),
        record(
            "axios",
            "^1.5.0",
            "Promise based HTTP client",
            &[r"axios\.", r"axios\("],
        ),
        record(
            "date-fns",
            "^2.30.0",
            "Modern JavaScript date utility library",
            &[r"format\(", "parseISO", "addDays", "subDays"],
        ),
        record(
            "lodash",
            "^4.17.21",
            "Utility library",
            &[r"_\.", "debounce", "throttle", "cloneDeep"],
        ),
        record(
            "react-dnd",
            "^16.0.1",
            "Drag and drop for React",
            &["useDrag", "useDrop", "DndProvider"],
        ),
        record(
            "react-beautiful-dnd",
            "^13.1.1",
            "Beautiful drag and drop",
            &["DragDropContext", "Droppable", "Draggable"],
        ),
        record(
            "react-select",
            "^5.7.7",
            "Select component for React",
            &[r#"Select from ['"]react-select"#],
        ),
        record(
            "react-datepicker",
            "^4.21.0",
            "Date picker component",
            &["DatePicker", "react-datepicker"],
        ),
        record(
            "react-modal",
            "^3.16.1",
            "Accessible modal dialog",
            &[r#"Modal from ['"]react-modal"#],
        ),
        record(
            "react-tooltip",
            "^5.21.4",
            "Tooltip component",
            &["Tooltip", "react-tooltip"],
        ),
        record(
            "react-hot-toast",
            "^2.4.1",
            "Toast notifications",
            &[r"toast\.", "Toaster"],
        ),
        record(
            "sonner",
            "^1.0.3",
            "Opinionated toast component",
            &[r#"toast from ['"]sonner"#, r#"Toaster from ['"]sonner"#],
        ),
        // Blockchain / web3
        record(
            "ethers",
            "^6.8.0",
            "Ethereum library",
            &[r"ethers\.", "Contract", "Provider", "Signer"],
        ),
        record(
            "wagmi",
            "^1.4.0",
            "React hooks for Ethereum",
            &["useAccount", "useConnect", "useContract", "useBalance"],
        ),
        record(
            "viem",
            "^1.16.0",
            "TypeScript interface for Ethereum",
            &["createPublicClient", "createWalletClient", "parseEther"],
        ),
        record(
            "@rainbow-me/rainbowkit",
            "^1.3.0",
            "Wallet connection UI",
            &["ConnectButton", "RainbowKitProvider"],
        ),
        record(
            "web3",
            "^4.2.0",
            "Ethereum JavaScript API",
            &[r"Web3\(", r"web3\."],
        ),
        // State management
        record(
            "zustand",
            "^4.4.4",
            "Small, fast state management",
            &[r#"create from ['"]zustand"#, "useStore"],
        ),
        record(
            "redux",
            "^4.2.1",
            "Predictable state container",
            &["createStore", "useSelector", "useDispatch"],
        ),
        record(
            "@reduxjs/toolkit",
            "^1.9.7",
            "Official Redux toolkit",
            &["configureStore", "createSlice", "createAsyncThunk"],
        ),
        record(
            "jotai",
            "^2.4.3",
            "Primitive and flexible state management",
            &[r"atom\(", "useAtom", "useAtomValue"],
        ),
        // Development tools
        dev_record(
            "@types/react",
            "^18.2.0",
            "TypeScript definitions for React",
            &[r"React\.FC", r"React\.Component", r"JSX\.Element"],
        ),
        dev_record(
            "@types/node",
            "^20.8.0",
            "TypeScript definitions for Node.js",
            &[r"NodeJS\.", "Buffer", r"process\."],
        ),
        dev_record(
            "typescript",
            "^5.2.0",
            "TypeScript language",
            &["interface ", "type ", ": string", ": number"],
        ),
        // AI and ML libraries
        record(
            "openai",
            "^4.0.0",
            "OpenAI API client",
            &["OpenAI", r"openai\."],
        ),
        record(
            "@ai-sdk/openai",
            "^1.0.0",
            "AI SDK for OpenAI",
            &[r#"openai from ['"]@ai-sdk/openai"#],
        ),
        record(
            "ai",
            "^2.0.0",
            "AI utilities for JavaScript",
            &["generateText", "streamText", "generateImage"],
        ),
        record(
            "langchain",
            "^0.0.75",
            "LangChain for JavaScript",
            &["LLMChain", "PromptTemplate", "ChatOpenAI"],
        ),
        record(
            "@huggingface/inference",
            "^2.6.1",
            "Hugging Face Inference API",
            &["HfInference", "huggingface"],
        ),
        record(
            "transformers.js",
            "^2.6.0",
            "Run Transformers in the browser",
            &["pipeline", "AutoTokenizer", "AutoModel"],
        ),
    ]
}
