//! Central constants for the repowiki indexer

/// Default values for configuration
pub mod config {
    /// Default configuration file name
    pub const DEFAULT_CONFIG_FILE: &str = "repowiki.yaml";

    /// Default output directory for generated documentation
    pub const DEFAULT_OUTPUT_DIR: &str = "wiki";
}

/// Ignore-file discovery and built-in ignore defaults
pub mod ignore {
    /// Repository-local ignore file
    pub const IGNORE_FILE: &str = ".gitignore";

    /// Repository-local exclude file kept inside VCS metadata
    pub const EXCLUDE_FILE: &str = ".git/info/exclude";

    /// Global ignore file, relative to the user's home directory
    pub const GLOBAL_IGNORE_FILE: &str = ".gitignore_global";

    /// Directory names ignored at any depth before rules are consulted
    pub const COMMON_DIRS: &[&str] = &[
        "node_modules",
        "__pycache__",
        ".git",
        ".svn",
        ".hg",
        "venv",
        "env",
        ".env",
        "virtualenv",
        ".venv",
        "build",
        "dist",
        "target",
        "out",
        ".next",
        ".nuxt",
        ".idea",
        ".vscode",
        ".vs",
        "coverage",
        ".nyc_output",
        "htmlcov",
        ".pytest_cache",
        ".tox",
        ".mypy_cache",
        ".ruff_cache",
    ];

    /// Generated-file suffixes ignored before rules are consulted
    pub const COMMON_SUFFIXES: &[&str] = &[
        ".pyc", ".pyo", ".class", ".o", ".so", ".dll", ".exe", ".bin", ".jar", ".war", ".log",
        ".tmp", ".temp", ".cache", ".swp", ".swo", ".min.js", ".min.css",
    ];

    /// Operating-system litter matched anywhere in a path
    pub const COMMON_FRAGMENTS: &[&str] = &[".DS_Store", "Thumbs.db", ".coverage"];
}

/// Static scanner exclusions and categorization tables
pub mod scanner {
    /// Directory names never descended into
    pub const EXCLUDED_DIRS: &[&str] = &[
        ".git",
        ".svn",
        ".hg",
        "node_modules",
        "__pycache__",
        ".pytest_cache",
        "venv",
        "env",
        ".env",
        "virtualenv",
        "build",
        "dist",
        "target",
        "out",
        ".idea",
        ".vscode",
        ".vs",
    ];

    /// Binary and artifact extensions dropped during scanning
    pub const EXCLUDED_EXTENSIONS: &[&str] = &[
        ".pyc", ".pyo", ".class", ".o", ".so", ".dll", ".exe", ".bin", ".jar", ".war", ".log",
        ".tmp", ".temp", ".cache", ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".ico", ".mp3",
        ".mp4", ".wav", ".avi", ".mov", ".zip", ".tar", ".gz", ".rar", ".7z",
    ];

    /// Extensions categorized as code
    pub const CODE_EXTENSIONS: &[&str] = &[
        ".py", ".js", ".ts", ".jsx", ".tsx", ".java", ".cpp", ".c", ".h", ".cs", ".php", ".rb",
        ".go", ".rs", ".kt", ".swift",
    ];

    /// Extensions categorized as configuration
    pub const CONFIG_EXTENSIONS: &[&str] = &[
        ".json", ".yaml", ".yml", ".toml", ".ini", ".cfg", ".conf",
    ];

    /// Lowercase file names categorized as configuration regardless of extension
    pub const CONFIG_NAMES: &[&str] = &["dockerfile", "makefile", "requirements.txt"];

    /// Extensions categorized as documentation
    pub const DOC_EXTENSIONS: &[&str] = &[".md", ".txt", ".rst", ".org", ".adoc"];

    /// Substrings in a lowercase file name that mark a test file
    pub const TEST_MARKERS: &[&str] = &["test", "spec", "__test__"];

    /// File names sorted ahead of their category peers
    pub const IMPORTANT_NAMES: &[&str] = &[
        "main.py",
        "app.py",
        "index.js",
        "main.js",
        "server.js",
        "main.rs",
        "lib.rs",
        "README.md",
        "requirements.txt",
        "package.json",
        "Cargo.toml",
        "Dockerfile",
    ];

    /// Manifest and build files reported as detected configuration
    pub const CONFIG_FILE_NAMES: &[&str] = &[
        "requirements.txt",
        "package.json",
        "Cargo.toml",
        "go.mod",
        "pom.xml",
        "build.gradle",
        "Makefile",
        "CMakeLists.txt",
        "Dockerfile",
        "docker-compose.yml",
        ".env",
        "config.yml",
        "pyproject.toml",
        "setup.py",
        "tsconfig.json",
    ];

    /// Number of entries kept in the extension histogram
    pub const HISTOGRAM_SIZE: usize = 10;
}

/// Analysis eligibility and scheduling defaults
pub mod analysis {
    /// Hard size ceiling for any analyzed file
    pub const MAX_FILE_SIZE: u64 = 500_000;

    /// Softer ceiling applied to documentation files
    pub const MAX_DOC_SIZE: u64 = 100_000;

    /// Code files smaller than this carry too little structure to analyze
    pub const MIN_CODE_SIZE: u64 = 50;

    /// Width of the analysis worker pool
    pub const WORKERS: usize = 4;

    /// Eligible-file cap for very large repositories
    pub const MAX_FILES: usize = 5000;

    /// Progress is logged every this many completed files
    pub const PROGRESS_INTERVAL: usize = 500;

    /// Extensions considered analyzable source
    pub const SOURCE_EXTENSIONS: &[&str] = &[
        ".py", ".js", ".ts", ".jsx", ".tsx", ".java", ".cpp", ".c", ".h", ".cs", ".php", ".rb",
        ".go", ".rs", ".kt", ".scala", ".swift", ".vue", ".svelte", ".dart", ".r", ".jl", ".m",
        ".mm",
    ];

    /// Path fragments that disqualify a code file from analysis
    pub const SKIP_PATTERNS: &[&str] = &[
        "test",
        "spec",
        "__test__",
        ".test.",
        ".spec.",
        "mock",
        "fixture",
        "sample",
        "example",
        "vendor",
        "third_party",
        "external",
        "generated",
        "build",
        "dist",
        "min.js",
        "min.css",
        "bundle.js",
        "bundle.css",
        "lock.json",
        "package-lock.json",
        "yarn.lock",
        "migration",
        "seed",
        "schema.sql",
    ];

    /// Conventional source directory names
    pub const SOURCE_DIRS: &[&str] = &[
        "src",
        "lib",
        "app",
        "components",
        "pages",
        "views",
        "controllers",
        "models",
        "services",
    ];

    /// Entry-point file names ranked first under the eligible-file cap
    pub const ENTRY_POINTS: &[&str] = &[
        "main.py",
        "app.py",
        "index.js",
        "main.js",
        "server.js",
        "__init__.py",
        "main.rs",
        "lib.rs",
        "main.go",
    ];

    /// Source directories ranked second under the eligible-file cap
    pub const PRIORITY_DIRS: &[&str] = &["src", "lib", "app", "components", "pages"];
}

/// Chunking defaults
pub mod chunking {
    /// Target chunk size in characters
    pub const TARGET_SIZE: usize = 1000;

    /// Characters shared between consecutive chunks
    pub const OVERLAP: usize = 200;

    /// Length of the content-hash prefix used in chunk identifiers
    pub const HASH_PREFIX_LEN: usize = 16;
}

/// Content store defaults
pub mod store {
    /// Largest batch sent to the store in one upsert
    pub const MAX_BATCH_SIZE: usize = 4000;

    /// Batch size below which halving stops and the failure is surfaced
    pub const MIN_BATCH_SIZE: usize = 100;

    /// Largest source file wrapped into the search corpus
    pub const MAX_INDEXED_FILE_SIZE: u64 = 1024 * 1024;

    /// Smallest source file wrapped into the search corpus
    pub const MIN_INDEXED_FILE_SIZE: u64 = 10;

    /// Extensions wrapped into the search corpus
    pub const INDEXABLE_EXTENSIONS: &[&str] = &[
        ".py", ".js", ".ts", ".jsx", ".tsx", ".java", ".cpp", ".c", ".h", ".cs", ".php", ".rb",
        ".go", ".rs", ".kt", ".swift", ".md", ".txt", ".rst", ".json", ".yaml", ".yml", ".toml",
        ".sh", ".sql", ".html", ".css",
    ];

    /// Path fragments never wrapped into the search corpus
    pub const SKIP_PATTERNS: &[&str] = &[
        "node_modules",
        ".git",
        "__pycache__",
        ".min.",
        "package-lock.json",
        "yarn.lock",
        "Cargo.lock",
    ];

    /// Metadata value recorded for chunks of generated memos
    pub const MEMO_CONTENT_TYPE: &str = "memo_chunk";
}

/// Text-generation defaults
pub mod generation {
    /// OpenAI-compatible endpoint
    pub const DEFAULT_BASE_URL: &str = "https://api.llama.com/compat/v1";

    /// Default model name
    pub const DEFAULT_MODEL: &str = "Llama-4-Maverick-17B-128E-Instruct-FP8";

    /// Environment variable holding the API key
    pub const API_KEY_ENV: &str = "LLAMA_API_KEY";

    /// Per-request timeout in seconds
    pub const TIMEOUT_SECS: u64 = 60;

    /// Default sampling temperature for prose
    pub const TEMPERATURE: f32 = 0.3;

    /// Default output budget for prose
    pub const MAX_OUTPUT: u32 = 3000;

    /// Output budget for outline requests
    pub const OUTLINE_MAX_OUTPUT: u32 = 2000;

    /// Default User-Agent header for API requests
    pub const USER_AGENT: &str = concat!("repowiki/", env!("CARGO_PKG_VERSION"));
}

/// Fixed fallback strings
pub mod fallback {
    /// Batch narrative when no repository was indexed
    pub const NOTHING_INDEXED: &str = "No repositories were successfully indexed.";

    /// Appended to sections whose prose could not be generated
    pub const SECTION_NOTICE: &str = "*Content generation failed. Please update manually.*";

    /// Written under each file whose page batch could not be generated
    pub const FILE_NOTICE: &str =
        "*Detailed documentation could not be generated. The file is still indexed for search.*";
}

/// Documentation tree layout
pub mod docs {
    /// Longest generated file or directory name
    pub const MAX_NAME_LEN: usize = 50;

    pub const README_FILE: &str = "README.md";

    /// Navigation file listing every folder and section
    pub const INDEX_FILE: &str = "index.md";

    /// Longest excerpt of a file quoted into a generation prompt
    pub const PROMPT_EXCERPT_LEN: usize = 1500;

    /// Files quoted per section prompt
    pub const PROMPT_FILE_LIMIT: usize = 5;

    /// Marker a generated section may leave where its diagram belongs
    pub const DIAGRAM_PLACEHOLDER: &str = "<!-- DIAGRAM_PLACEHOLDER -->";

    /// Classes drawn in one diagram
    pub const DIAGRAM_CLASS_LIMIT: usize = 30;

    /// Import and inheritance arrows drawn in one diagram
    pub const DIAGRAM_EDGE_LIMIT: usize = 40;

    /// Routes drawn in one request-flow diagram
    pub const DIAGRAM_ROUTE_LIMIT: usize = 10;

    /// Methods or properties listed per class in a class diagram
    pub const DIAGRAM_MEMBER_LIMIT: usize = 12;

    /// Examples of one kind appended to a section
    pub const EXAMPLE_LIMIT: usize = 3;

    /// Route examples appended to an API section
    pub const API_EXAMPLE_LIMIT: usize = 5;

    /// Server address used in request examples
    pub const EXAMPLE_BASE_URL: &str = "http://localhost:8000";

    /// Longest configuration excerpt shown as an example
    pub const CONFIG_EXAMPLE_LEN: usize = 500;

    /// Lines of a test body shown as an example
    pub const TEST_EXAMPLE_LINES: usize = 15;

    /// Per-file page added to the components folder of analyzed repositories
    pub const FILE_DOCUMENTATION_SECTION: &str = "file-documentation";

    /// Files described per generation call on the per-file page
    pub const FILE_DOC_BATCH_SIZE: usize = 5;

    /// Files described on the per-file page
    pub const FILE_DOC_LIMIT: usize = 100;

    /// Longest excerpt of each file quoted into a per-file prompt
    pub const FILE_DOC_EXCERPT_LEN: usize = 2000;

    pub const FILE_DOC_TEMPERATURE: f32 = 0.3;
    pub const FILE_DOC_MAX_OUTPUT: u32 = 3000;
}

/// Structure planning heuristics
pub mod planner {
    /// Files sampled for technology signals
    pub const SIGNAL_SAMPLE_FILES: usize = 200;

    /// Bytes read from each sampled file
    pub const SIGNAL_SAMPLE_BYTES: usize = 4096;

    pub const WEB_FRAMEWORKS: &[&str] = &[
        "flask", "fastapi", "django", "express", "koa", "nestjs", "spring", "gin", "echo",
        "actix", "axum", "rocket", "rails", "sinatra", "laravel", "aspnet",
    ];

    pub const CLI_FRAMEWORKS: &[&str] = &[
        "click", "argparse", "typer", "commander", "yargs", "clap", "cobra", "urfave/cli",
        "thor", "picocli",
    ];

    pub const DATABASE_DRIVERS: &[&str] = &[
        "sqlalchemy", "psycopg", "pymongo", "mongoose", "sequelize", "prisma", "typeorm",
        "diesel", "sqlx", "gorm", "hibernate", "redis", "sqlite3", "mysql", "postgres",
    ];

    pub const TEST_FRAMEWORKS: &[&str] = &[
        "pytest", "unittest", "jest", "mocha", "vitest", "junit", "rspec", "phpunit", "xunit",
        "nunit",
    ];

    /// Class-name fragments and the component kind each one implies
    ///
    /// Checked in order; the first kind with a matching fragment wins.
    pub const COMPONENT_PATTERNS: &[(&str, &[&str])] = &[
        ("agents", &["agent", "worker", "processor"]),
        ("managers", &["manager", "controller", "coordinator", "supervisor"]),
        ("services", &["service", "provider", "handler", "gateway"]),
        ("clients", &["client", "connector", "adapter", "driver"]),
        ("models", &["model", "schema", "entity", "dto"]),
        ("utilities", &["util", "helper", "tool", "common"]),
        ("configurations", &["config", "setting", "option", "env"]),
        ("databases", &["db", "database", "storage", "repository", "dao"]),
        ("apis", &["api", "router", "endpoint", "route"]),
        ("ui", &["component", "widget", "view", "page"]),
    ];

    /// Class count above which the architecture folder gains a data-flow page
    pub const DATA_FLOW_CLASS_THRESHOLD: usize = 10;

    /// Class count above which the architecture folder gains a patterns page
    pub const PATTERNS_CLASS_THRESHOLD: usize = 5;

    /// A directory counts as a source directory above either file count
    pub const SOURCE_DIRECTORY_CODE_FILES: usize = 2;
    pub const SOURCE_DIRECTORY_FILES: usize = 5;

    /// Source directories named in the architecture outline
    pub const SOURCE_DIRECTORY_LIMIT: usize = 5;

    /// Paths whose presence marks CI configuration
    pub const CI_PATHS: &[&str] = &[
        ".github/workflows/",
        ".gitlab-ci.yml",
        ".circleci/",
        "Jenkinsfile",
        ".travis.yml",
        "azure-pipelines.yml",
    ];

    /// File names whose presence marks container builds
    pub const CONTAINER_FILES: &[&str] = &[
        "Dockerfile",
        "docker-compose.yml",
        "docker-compose.yaml",
        "compose.yaml",
        "Containerfile",
    ];

    /// Dependency manifests and the stack each one implies
    pub const MANIFEST_STACKS: &[(&str, &str)] = &[
        ("requirements.txt", "Python"),
        ("pyproject.toml", "Python"),
        ("setup.py", "Python"),
        ("package.json", "Node.js"),
        ("tsconfig.json", "TypeScript"),
        ("Cargo.toml", "Rust"),
        ("go.mod", "Go"),
        ("pom.xml", "Java (Maven)"),
        ("build.gradle", "JVM (Gradle)"),
        ("Gemfile", "Ruby"),
        ("composer.json", "PHP"),
        ("CMakeLists.txt", "C/C++ (CMake)"),
    ];
}

/// Orchestration limits
pub mod pipeline {
    /// Stages one repository passes through, `Scan` to `Advance`
    pub const STEPS_PER_REPOSITORY: usize = 7;

    /// Scope used for batch-level log lines
    pub const SCOPE: &str = "indexer";

    /// Upper bound on state-machine steps for a batch of `repositories`
    pub const fn step_budget(repositories: usize) -> usize {
        (repositories + 1) * STEPS_PER_REPOSITORY + 2
    }
}
