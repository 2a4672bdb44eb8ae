use bumpalo::Bump;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use esparse_parser::{parse, ParserOptions, SourceTypeOption};

// A medium-size module exercising most of the core grammar
const JAVASCRIPT_SOURCE: &str = r#"
import { EventEmitter } from 'events';
import * as path from 'path';

const DEFAULT_OPTIONS = { retries: 3, timeout: 1_000, verbose: false };

export class TaskQueue extends EventEmitter {
    #pending = [];
    #running = 0;
    static instances = 0;

    constructor(options = {}) {
        super();
        this.options = { ...DEFAULT_OPTIONS, ...options };
        TaskQueue.instances++;
    }

    get size() {
        return this.#pending.length;
    }

    push(task, { priority = 0, label } = {}) {
        this.#pending.push({ task, priority, label: label ?? `task-${this.size}` });
        this.#pending.sort((a, b) => b.priority - a.priority);
        this.emit('queued', label);
        return this;
    }

    async *drain() {
        while (this.#pending.length > 0) {
            const { task, label } = this.#pending.shift();
            this.#running++;
            try {
                yield await task();
            } catch (error) {
                if (this.options.verbose) console.error(label, error?.message);
            } finally {
                this.#running--;
            }
        }
    }
}

export function resolveAll(files, base = process.cwd()) {
    const seen = new Set();
    return files
        .map((file) => path.resolve(base, file))
        .filter((file) => !seen.has(file) && seen.add(file))
        .reduce((acc, file, index) => {
            acc[file] = index % 2 === 0 ? /\.m?js$/i.test(file) : null;
            return acc;
        }, Object.create(null));
}

export default async function main(argv) {
    const queue = new TaskQueue({ verbose: argv.includes('--verbose') });
    for (const [index, arg] of argv.entries()) {
        queue.push(() => Promise.resolve(arg.toUpperCase()), { priority: index });
    }
    for await (const result of queue.drain()) {
        console.log(result);
    }
    return queue.size === 0 ? 0 : 1;
}
"#;

// TypeScript with types, generics, and declarations
const TYPESCRIPT_SOURCE: &str = r#"
interface User {
    id: number;
    name: string;
    email?: string;
    preferences: { theme: 'light' | 'dark'; notifications: boolean };
}

type UserId = User['id'];
type UserMap = Map<UserId, User>;

enum Role { Reader, Writer = 4, Admin }

abstract class Repository<T extends { id: number }> {
    protected readonly items: Map<number, T> = new Map();

    constructor(private readonly name: string) {}

    abstract validate(item: T): item is T;

    save(item: T): boolean {
        if (!this.validate(item)) return false;
        this.items.set(item.id, item);
        return true;
    }

    find<K extends keyof T>(key: K, value: T[K]): T | undefined {
        for (const item of this.items.values()) {
            if (item[key] === value) return item;
        }
        return undefined;
    }
}

export class UserRepository extends Repository<User> {
    validate(user: User): user is User {
        return user.name.length > 0 && (user.email?.includes('@') ?? true);
    }
}

export async function load(ids: readonly UserId[]): Promise<Array<User | null>> {
    const repo = new UserRepository('users');
    return ids.map((id) => repo.find('id', id) ?? null);
}

export const roles = [Role.Reader, Role.Admin] as const;
export type { UserMap };
"#;

// JSX component
const JSX_SOURCE: &str = r#"
export function TodoList({ items, onToggle }) {
    const done = items.filter((item) => item.done).length;
    return (
        <section className="todo">
            <h1>Todos ({done}/{items.length})</h1>
            <ul>
                {items.map((item) => (
                    <li key={item.id} onClick={() => onToggle(item.id)} data-done={item.done}>
                        {item.done ? <s>{item.text}</s> : item.text}
                    </li>
                ))}
            </ul>
            <>
                <Footer.Summary count={items.length} {...summaryProps} />
            </>
        </section>
    );
}
"#;

fn module_options() -> ParserOptions {
    ParserOptions::default().with_source_type(SourceTypeOption::Module)
}

fn bench_parse_javascript(c: &mut Criterion) {
    let options = module_options();
    c.bench_function("parse_javascript_medium", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let file = parse(&arena, black_box(JAVASCRIPT_SOURCE), &options);
            black_box(file.is_ok());
        });
    });
}

fn bench_parse_with_tokens(c: &mut Criterion) {
    let options = module_options().with_tokens(true);
    c.bench_function("parse_javascript_tokens", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let file = parse(&arena, black_box(JAVASCRIPT_SOURCE), &options);
            black_box(file.is_ok());
        });
    });
}

fn bench_parse_typescript(c: &mut Criterion) {
    let options = module_options().with_plugin("typescript");
    c.bench_function("parse_typescript_medium", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let file = parse(&arena, black_box(TYPESCRIPT_SOURCE), &options);
            black_box(file.is_ok());
        });
    });
}

fn bench_parse_jsx(c: &mut Criterion) {
    let options = module_options().with_plugin("jsx");
    c.bench_function("parse_jsx_component", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let file = parse(&arena, black_box(JSX_SOURCE), &options);
            black_box(file.is_ok());
        });
    });
}

fn bench_serialize_estree(c: &mut Criterion) {
    let options = module_options().with_plugin("estree");
    c.bench_function("serialize_estree_json", |b| {
        b.iter(|| {
            let arena = Bump::new();
            if let Ok(file) = parse(&arena, black_box(JAVASCRIPT_SOURCE), &options) {
                black_box(serde_json::to_string(&file).map(|json| json.len()).unwrap_or(0));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_parse_javascript,
    bench_parse_with_tokens,
    bench_parse_typescript,
    bench_parse_jsx,
    bench_serialize_estree
);
criterion_main!(benches);
